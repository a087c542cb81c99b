//! docbullet CLI - add tech-stack bullet points to resume DOCX files

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docbullet::{
    parse_tech_stacks, process_batch, BatchEvent, BatchJob, DetectorConfig, DocxPackage,
    ProcessOptions, ProcessReport, ProcessResponse, ProcessingMode, ResumeProcessor,
    SectionDetector, TechStacks,
};

#[derive(Parser)]
#[command(name = "docbullet")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Insert tech-stack bullet points into resume DOCX files", long_about = None)]
struct Cli {
    /// Input DOCX file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output DOCX file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    stacks: StackArgs,

    #[command(flatten)]
    tuning: TuningArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert points into a resume
    Process {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <name>_updated.docx next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        stacks: StackArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// List the projects found in a resume
    Detect {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Detector keyword configuration (JSON)
        #[arg(long, value_name = "FILE", env = "DOCBULLET_CONFIG")]
        config: Option<PathBuf>,

        /// Print projects as JSON
        #[arg(long)]
        json: bool,
    },

    /// Process several resumes in parallel
    Batch {
        /// Input DOCX files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        stacks: StackArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct StackArgs {
    /// Tech stacks as a JSON object of name -> list of points
    #[arg(long, value_name = "FILE", env = "DOCBULLET_STACKS")]
    stacks: Option<PathBuf>,

    /// Tech stacks as free text (name line followed by • bullets)
    #[arg(long, value_name = "FILE", env = "DOCBULLET_POINTS", conflicts_with = "stacks")]
    points: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct TuningArgs {
    /// Number of projects that receive points
    #[arg(long, default_value = "3", env = "DOCBULLET_MAX_PROJECTS")]
    max_projects: usize,

    /// Pipeline selection
    #[arg(long, value_enum, default_value = "auto", env = "DOCBULLET_MODE")]
    mode: Mode,

    /// Paragraph count above which auto mode switches to streaming
    #[arg(long, default_value = "200", env = "DOCBULLET_STREAMING_THRESHOLD")]
    streaming_threshold: usize,

    /// Detector keyword configuration (JSON)
    #[arg(long, value_name = "FILE", env = "DOCBULLET_CONFIG")]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Streaming above the threshold, full otherwise
    Auto,
    /// Always clone formatting from nearby bullets
    Full,
    /// Always use the fast path with a fixed marker
    Streaming,
}

impl From<Mode> for ProcessingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Auto => ProcessingMode::Auto,
            Mode::Full => ProcessingMode::Full,
            Mode::Streaming => ProcessingMode::Streaming,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Process {
            input,
            output,
            stacks,
            tuning,
        }) => cmd_process(&input, output.as_deref(), &stacks, &tuning),
        Some(Commands::Detect {
            input,
            config,
            json,
        }) => cmd_detect(&input, config.as_deref(), json),
        Some(Commands::Batch {
            inputs,
            output_dir,
            stacks,
            tuning,
        }) => cmd_batch(&inputs, &output_dir, &stacks, &tuning),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: process if input is provided
            if let Some(input) = cli.input {
                cmd_process(&input, cli.output.as_deref(), &cli.stacks, &cli.tuning)
            } else {
                println!(
                    "{}",
                    "Usage: docbullet <FILE> [OUTPUT] --stacks <FILE>".yellow()
                );
                println!("       docbullet --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_stacks(args: &StackArgs) -> Result<TechStacks, Box<dyn std::error::Error>> {
    let stacks = match (&args.stacks, &args.points) {
        (Some(path), _) => serde_json::from_str::<TechStacks>(&fs::read_to_string(path)?)?,
        (None, Some(path)) => parse_tech_stacks(&fs::read_to_string(path)?)?,
        (None, None) => return Err("either --stacks or --points is required".into()),
    };

    if stacks.is_empty() {
        return Err("No valid tech stacks found".into());
    }
    Ok(stacks)
}

fn load_detector_config(path: Option<&Path>) -> Result<DetectorConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => Ok(DetectorConfig::default()),
    }
}

fn build_options(tuning: &TuningArgs) -> Result<ProcessOptions, Box<dyn std::error::Error>> {
    Ok(ProcessOptions::new()
        .with_max_projects(tuning.max_projects)
        .with_mode(tuning.mode.into())
        .with_streaming_threshold(tuning.streaming_threshold)
        .with_detector(load_detector_config(tuning.config.as_deref())?))
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_updated.docx", stem))
}

fn cmd_process(
    input: &Path,
    output: Option<&Path>,
    stack_args: &StackArgs,
    tuning: &TuningArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let stacks = load_stacks(stack_args)?;
    let processor = ResumeProcessor::new(build_options(tuning)?);
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output(input));

    let pb = if tuning.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Processing {}...", input.display()));

    let result = processor.process_file(input, &stacks);
    if let Ok(report) = &result {
        fs::write(&output, &report.output)?;
    }
    pb.finish_and_clear();

    if tuning.json {
        println!("{}", ProcessResponse::from_result(&result).to_json()?);
        result?;
        return Ok(());
    }

    let report = result?;
    print_report(&report);
    println!("\n{} {}", "Saved".green().bold(), output.display());

    Ok(())
}

fn print_report(report: &ProcessReport) {
    println!("{}", "Distribution".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for allocation in &report.distribution.projects {
        println!(
            "{} {}",
            allocation.title.bold(),
            format!("({} points)", allocation.total_points).dimmed()
        );
        let pairs: Vec<_> = allocation.points().collect();
        for (i, (tech, point)) in pairs.iter().enumerate() {
            let branch = if i + 1 == pairs.len() { "└─" } else { "├─" };
            println!("  {} {}: {}", branch.dimmed(), tech.cyan(), point);
        }
    }

    println!();
    println!("{}: {}", "Points added".bold(), report.points_added);
    println!("{}: {}", "Projects modified".bold(), report.projects_modified);
    println!("{}: {}", "Method".bold(), report.method);
    println!("{}: {} ms", "Elapsed".bold(), report.elapsed_ms);
}

fn cmd_detect(input: &Path, config: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let package = DocxPackage::open(input)?;
    let detector = SectionDetector::with_config(load_detector_config(config)?);
    let projects = detector.detect(package.document());

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    println!("{}", "Detected Projects".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!(
        "{}: {}",
        "Paragraphs".bold(),
        package.document().paragraph_count()
    );
    println!();

    if projects.is_empty() {
        println!("{}", "No projects found".yellow());
        return Ok(());
    }

    for project in &projects {
        println!(
            "{}. {} {}",
            project.index + 1,
            project.title.bold(),
            format!(
                "[{}..={}]",
                project.responsibilities_start, project.responsibilities_end
            )
            .dimmed()
        );
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    stack_args: &StackArgs,
    tuning: &TuningArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let stacks = load_stacks(stack_args)?;
    let processor = ResumeProcessor::new(build_options(tuning)?);
    fs::create_dir_all(output_dir)?;

    let jobs: Vec<BatchJob> = inputs
        .iter()
        .map(|input| BatchJob::into_dir(input, output_dir))
        .collect();

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let outcomes = std::thread::scope(|scope| {
        let progress = pb.clone();
        scope.spawn(move || {
            for event in rx {
                if let BatchEvent::Finished { input, .. } = event {
                    progress.set_message(input.display().to_string());
                    progress.inc(1);
                }
            }
        });

        let outcomes = process_batch(&processor, &jobs, &stacks, Some(&tx));
        drop(tx);
        outcomes
    });
    pb.finish_with_message("Done!");

    if tuning.json {
        let responses: Vec<ProcessResponse> = outcomes
            .iter()
            .map(|o| ProcessResponse::from_result(&o.result))
            .collect();
        println!("{}", serde_json::to_string_pretty(&responses)?);
    } else {
        println!("\n{}", "Results:".green().bold());
        for outcome in &outcomes {
            match &outcome.result {
                Ok(report) => println!(
                    "  {} {} ({} points)",
                    "✓".green(),
                    outcome.job.output.display(),
                    report.points_added
                ),
                Err(e) => println!("  {} {}: {}", "✗".red(), outcome.job.input.display(), e),
            }
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        return Err(format!("{} of {} documents failed", failed, outcomes.len()).into());
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docbullet".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Resume tech-stack bullet inserter");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docbullet".dimmed());
    println!("License: MIT");
}

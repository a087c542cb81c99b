//! End-to-end tests: package bytes in, package bytes out.

mod common;

use common::{build_docx, bullet, list_item, p, read_entry, sample_resume, STYLES};
use docbullet::{
    parse_tech_stacks, process_bytes, process_file, Customizer, DetectorConfig, DistributionMethod,
    DocxPackage, Error, ProcessResponse, TechStacks,
};

fn react_node() -> TechStacks {
    TechStacks::new()
        .with("React", ["UI work", "Hooks work"])
        .with("Node", ["API work"])
}

fn texts(package: &[u8]) -> Vec<String> {
    let doc = DocxPackage::from_bytes(package).unwrap();
    let doc = doc.document();
    (0..doc.paragraph_count()).map(|i| doc.paragraph_text(i)).collect()
}

#[test]
fn test_points_follow_local_markers() {
    let report = process_bytes(&build_docx(&sample_resume()), &react_node()).unwrap();

    assert_eq!(report.points_added, 3);
    assert_eq!(report.projects_modified, 2);
    assert_eq!(report.method, DistributionMethod::RoundRobin);

    let texts = texts(&report.output);
    assert_eq!(texts.len(), 14);
    assert_eq!(texts[4], "- Built the checkout flow");
    assert_eq!(texts[5], "- UI work");
    assert_eq!(texts[6], "- API work");
    assert_eq!(texts[7], "- Tuned database queries");
    assert_eq!(texts[12], "- Wrote nightly reports");
    assert_eq!(texts[13], "- Hooks work");
}

#[test]
fn test_new_points_clone_indent_and_fonts() {
    let report = process_bytes(&build_docx(&sample_resume()), &react_node()).unwrap();
    let xml = read_entry(&report.output, "word/document.xml");

    // Three original bullets plus three new ones share the hanging indent.
    assert_eq!(xml.matches(r#"w:hanging="360""#).count(), 6);
    assert_eq!(xml.matches(r#"w:ascii="Calibri""#).count(), 6);
}

#[test]
fn test_untouched_content_is_preserved() {
    let input = build_docx(&sample_resume());
    let report = process_bytes(&input, &react_node()).unwrap();
    let xml = read_entry(&report.output, "word/document.xml");

    for original in sample_resume() {
        assert!(xml.contains(&original), "lost paragraph {}", original);
    }
    assert!(xml.contains(r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body>"#));
    assert_eq!(read_entry(&report.output, "word/styles.xml"), STYLES);
}

#[test]
fn test_native_list_template() {
    let paragraphs = vec![
        p("Initech | 2016 - 2018"),
        p("Billing Portal"),
        list_item("Migrated invoices", 7),
    ];
    let stacks = TechStacks::new().with("Kafka", ["Built event pipelines"]);
    let report = process_bytes(&build_docx(&paragraphs), &stacks).unwrap();

    let xml = read_entry(&report.output, "word/document.xml");
    assert_eq!(xml.matches(r#"<w:numId w:val="7"/>"#).count(), 2);
    assert_eq!(texts(&report.output)[3], "Built event pipelines");
}

#[test]
fn test_no_projects_leaves_no_output() {
    let paragraphs = vec![p("Jane Doe"), p("Hobbies: chess")];
    let result = process_bytes(&build_docx(&paragraphs), &react_node());
    assert!(matches!(result, Err(Error::NoProjects)));

    let response = ProcessResponse::from_result(&result);
    let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("No projects found"));
}

#[test]
fn test_empty_stacks() {
    let result = process_bytes(&build_docx(&sample_resume()), &TechStacks::new());
    assert!(matches!(result, Err(Error::NoTechStacks)));
}

#[test]
fn test_success_response_shape() {
    let result = process_bytes(&build_docx(&sample_resume()), &react_node());
    let response = ProcessResponse::from_result(&result);
    let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["points_added"], 3);
    assert_eq!(json["projects_modified"], 2);
    assert_eq!(json["distribution_method"], "round_robin");
    assert!(json.get("error").is_none());
}

#[test]
fn test_large_document_uses_streaming() {
    let mut paragraphs = sample_resume();
    paragraphs.extend((0..250).map(|i| p(&format!("Filler line {}", i))));

    let report = process_bytes(&build_docx(&paragraphs), &react_node()).unwrap();
    assert_eq!(report.method, DistributionMethod::StreamingOptimized);
    assert_eq!(report.points_added, 3);

    let texts = texts(&report.output);
    assert_eq!(texts[4], "•\tUI work");
    assert_eq!(texts[5], "- Built the checkout flow");
    assert_eq!(texts[11], "•\tHooks work");
    assert_eq!(texts[12], "•\tAPI work");
}

#[test]
fn test_customizer_forces_full_on_large_document() {
    let mut paragraphs = sample_resume();
    paragraphs.extend((0..250).map(|i| p(&format!("Filler line {}", i))));

    let report = Customizer::new()
        .full()
        .process_bytes(&build_docx(&paragraphs), &react_node())
        .unwrap();
    assert_eq!(report.method, DistributionMethod::RoundRobin);
}

#[test]
fn test_free_text_points_end_to_end() {
    let stacks = parse_tech_stacks("React\n•\tUI work\n•\tHooks work\n\nNode:\n•\tAPI work\n").unwrap();
    assert_eq!(stacks, react_node());

    let report = process_bytes(&build_docx(&sample_resume()), &stacks).unwrap();
    assert_eq!(report.points_added, 3);
}

#[test]
fn test_process_file_leaves_input_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.docx");
    let input = build_docx(&sample_resume());
    std::fs::write(&path, &input).unwrap();

    let report = process_file(&path, &react_node()).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), input);
    assert_ne!(report.output, input);
}

#[test]
fn test_reprocessing_output_stacks_points() {
    let first = process_bytes(&build_docx(&sample_resume()), &react_node()).unwrap();
    let second = process_bytes(&first.output, &TechStacks::new().with("Go", ["gRPC services"])).unwrap();

    assert_eq!(second.points_added, 1);
    assert_eq!(texts(&second.output).len(), 15);
}

#[test]
fn test_bullet_glyph_preferred_over_dash() {
    let paragraphs = vec![
        p("Acme Corp | 2020 - 2022"),
        p("Mobile App"),
        p("Responsibilities:"),
        bullet("-", "Shipped releases"),
        bullet("▪", "Profiled startup"),
    ];
    let stacks = TechStacks::new().with("Swift", ["Wrote widgets"]);
    let report = process_bytes(&build_docx(&paragraphs), &stacks).unwrap();

    assert_eq!(texts(&report.output)[4], "▪ Wrote widgets");
}

#[test]
fn test_projects_modified_counts_projects_with_points() {
    let stacks = TechStacks::new().with("Go", ["Wrote the scheduler"]);
    let report = process_bytes(&build_docx(&sample_resume()), &stacks).unwrap();

    assert_eq!(report.points_added, 1);
    assert_eq!(report.projects_modified, 1);
}

#[test]
fn test_configured_glyph_is_cloned() {
    let paragraphs = vec![
        p("Acme Corp | 2020 - 2022"),
        p("Mobile App"),
        p("Responsibilities:"),
        bullet("➢", "Shipped releases"),
        bullet("➢", "Profiled startup"),
    ];
    let stacks = TechStacks::new().with("Swift", ["Wrote widgets"]);
    let report = Customizer::new()
        .with_detector(DetectorConfig::new().with_bullet_glyphs(['•', '➢']))
        .process_bytes(&build_docx(&paragraphs), &stacks)
        .unwrap();

    let texts = texts(&report.output);
    assert_eq!(texts[3], "➢ Shipped releases");
    assert_eq!(texts[4], "➢ Wrote widgets");
    assert_eq!(texts[5], "➢ Profiled startup");
}

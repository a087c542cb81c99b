//! Free-text technology/points input.
//!
//! Three block layouts are accepted, separated by blank lines:
//!
//! ```text
//! Java                 Java:                Java
//! •<TAB>point          •<TAB>point          • point
//! •<TAB>point          •<TAB>point          • point
//! ```
//!
//! Two or more spaces after the bullet count as a tab. A block's bullets must
//! all use the same layout. Anything else is rejected with a message listing
//! the accepted layouts.

use crate::error::{Error, Result};
use crate::stacks::TechStacks;

/// Longest accepted input, in characters.
pub const MAX_INPUT_CHARS: usize = 50_000;

const BULLET: char = '•';

const FORMAT_HELP: &str = "\
Please use one of these 3 supported formats:

FORMAT 1: Tech Stack (no colon) + Tabbed Bullet Points
Java
•\tPoint with tab indentation

FORMAT 2: Tech Stack with Colon + Tabbed Bullet Points
Java:
•\tPoint with tab indentation

FORMAT 3: Tech Stack (no colon) + Regular Bullet Points
Java
• Point with regular bullet (no tab)

Note: You can mix different formats in the same input.";

/// Parse free text into technology → points.
///
/// Empty input yields an empty map.
pub fn parse_tech_stacks(text: &str) -> Result<TechStacks> {
    if text.chars().count() > MAX_INPUT_CHARS {
        return Err(Error::InvalidInput(format!(
            "input exceeds {} characters",
            MAX_INPUT_CHARS
        )));
    }

    let blocks = split_blocks(text);
    for (i, block) in blocks.iter().enumerate() {
        if !is_valid_block(block) {
            let mut shown = block.iter().take(3).copied().collect::<Vec<_>>().join("\n");
            if block.len() > 3 {
                shown.push_str("\n...");
            }
            return Err(Error::InvalidInput(format!(
                "Block {} doesn't match any supported format:\n\n{}\n\n{}",
                i + 1,
                shown,
                FORMAT_HELP
            )));
        }
    }

    let mut stacks = TechStacks::new();
    for block in &blocks {
        let name = block[0].trim().trim_end_matches(':').trim();
        let points: Vec<String> = block[1..]
            .iter()
            .map(|line| bullet_content(line))
            .filter(|p| !p.is_empty())
            .collect();
        stacks.insert(name, points);
    }

    log::info!(
        "Parsed {} points from {} tech stacks",
        stacks.total_points(),
        stacks.len()
    );
    Ok(stacks)
}

/// Split into blocks of non-blank lines, right-trimmed.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in text.trim().lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn is_valid_block(block: &[&str]) -> bool {
    if block.len() < 2 {
        return false;
    }
    let name = block[0].trim();
    if starts_with_bullet(name) {
        return false;
    }
    let bullets = &block[1..];

    let tabbed = bullets.iter().all(|l| is_tabbed_bullet(l));
    if name.ends_with(':') {
        return tabbed;
    }
    tabbed || bullets.iter().all(|l| is_regular_bullet(l))
}

fn starts_with_bullet(line: &str) -> bool {
    line.starts_with([BULLET, '*', '-'])
}

/// `•` followed by a tab or at least two spaces.
fn is_tabbed_bullet(line: &str) -> bool {
    match line.strip_prefix(BULLET) {
        Some(rest) => rest.starts_with('\t') || rest.starts_with("  "),
        None => false,
    }
}

/// `•` followed by exactly one space.
fn is_regular_bullet(line: &str) -> bool {
    match line.strip_prefix(BULLET) {
        Some(rest) => rest.starts_with(' ') && !rest.starts_with("  "),
        None => false,
    }
}

fn bullet_content(line: &str) -> String {
    match line.strip_prefix(BULLET) {
        Some(rest) => rest.trim().to_string(),
        None => line.trim().to_string(),
    }
}

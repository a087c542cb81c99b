//! Bullet marker recognition on plain text.

/// Bullet glyphs, in detection order.
pub const BULLET_GLYPHS: &[char] = &['•', '●', '◦', '▪', '▫', '‣', '*'];

/// Dash variants used as bullet markers.
pub const DASH_GLYPHS: &[char] = &['-', '–', '—', '−'];

/// Marker used when nothing better is known.
pub const DEFAULT_MARKER: &str = "•";

/// Separator used when nothing better is known.
pub const DEFAULT_SEPARATOR: &str = "\t";

fn is_glyph(c: char) -> bool {
    BULLET_GLYPHS.contains(&c) || DASH_GLYPHS.contains(&c)
}

/// Check if a marker is a bare dash rather than a proper bullet glyph.
pub fn is_dash_marker(marker: &str) -> bool {
    let mut chars = marker.trim().chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if DASH_GLYPHS.contains(&c))
}

/// Length in bytes of a leading "12." or "3)" prefix.
fn numbered_prefix_len(text: &str) -> Option<usize> {
    let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    match text[digits..].chars().next() {
        Some('.') | Some(')') => Some(digits + 1),
        _ => None,
    }
}

/// Glyphs recognised as bullet markers: the built-in tables plus any
/// configured extras.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphSet {
    extra: Vec<char>,
}

impl GlyphSet {
    /// The built-in glyphs only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in glyphs plus `extra`.
    pub fn with_extra(extra: impl IntoIterator<Item = char>) -> Self {
        let mut set = Self::new();
        for c in extra {
            if !is_glyph(c) && !set.extra.contains(&c) {
                set.extra.push(c);
            }
        }
        set
    }

    /// Check if a character is a bullet glyph.
    pub fn contains(&self, c: char) -> bool {
        is_glyph(c) || self.extra.contains(&c)
    }

    /// Check if text starts like a bullet item.
    pub fn is_bullet_text(&self, text: &str) -> bool {
        let text = text.trim();
        match text.chars().next() {
            Some(c) if self.contains(c) => true,
            Some(_) => numbered_prefix_len(text).is_some(),
            None => false,
        }
    }

    /// Extract the marker a bullet line starts with.
    ///
    /// A glyph counts when it is followed by whitespace, by a non-alphanumeric
    /// character, or stands alone. Numbered items yield their prefix ("3.").
    pub fn extract_marker(&self, text: &str) -> Option<String> {
        let text = text.trim();
        let mut chars = text.chars();
        let first = chars.next()?;

        if self.contains(first) {
            match chars.next() {
                None => return Some(first.to_string()),
                Some(c) if !c.is_alphanumeric() => return Some(first.to_string()),
                Some(_) => {}
            }
        }

        numbered_prefix_len(text).map(|len| text[..len].to_string())
    }

    /// Strip leading markers, whitespace and a numbered prefix from point text.
    ///
    /// The numbered prefix only goes when whitespace or nothing follows it,
    /// so "3.5x faster" keeps its figure.
    pub fn clean_text(&self, text: &str) -> String {
        let stripped = text
            .trim_start_matches(|c: char| self.contains(c) || c == ' ' || c == '\t')
            .trim_start();
        match numbered_prefix_len(stripped) {
            Some(len) if stripped[len..].chars().next().map_or(true, char::is_whitespace) => {
                stripped[len..].trim_start().to_string()
            }
            _ => stripped.to_string(),
        }
    }
}

/// Check if text starts like a bullet item, using the built-in glyphs.
pub fn is_bullet_text(text: &str) -> bool {
    GlyphSet::new().is_bullet_text(text)
}

/// Extract the marker a bullet line starts with, using the built-in glyphs.
pub fn extract_marker(text: &str) -> Option<String> {
    GlyphSet::new().extract_marker(text)
}

/// Separator between marker and text: a tab when the marker is followed by
/// one, a single space when followed by a space, otherwise a tab.
pub fn detect_separator(text: &str, marker: &str) -> &'static str {
    let text = text.trim();
    match text.strip_prefix(marker).and_then(|rest| rest.chars().next()) {
        Some(' ') => " ",
        _ => DEFAULT_SEPARATOR,
    }
}

/// Strip leading markers, whitespace and a numbered prefix from point text.
pub fn clean_text(text: &str) -> String {
    GlyphSet::new().clean_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_marker() {
        assert_eq!(extract_marker("•\tBuilt APIs").as_deref(), Some("•"));
        assert_eq!(extract_marker("  - Shipped").as_deref(), Some("-"));
        assert_eq!(extract_marker("–Led").as_deref(), None);
        assert_eq!(extract_marker("▪(tight)").as_deref(), Some("▪"));
        assert_eq!(extract_marker("12. Numbered").as_deref(), Some("12."));
        assert_eq!(extract_marker("3) Numbered").as_deref(), Some("3)"));
        assert_eq!(extract_marker("2020 was a year"), None);
        assert_eq!(extract_marker("Plain"), None);
    }

    #[test]
    fn test_detect_separator() {
        assert_eq!(detect_separator("•\tBuilt", "•"), "\t");
        assert_eq!(detect_separator("•  Built", "•"), " ");
        assert_eq!(detect_separator("1.Built", "1."), "\t");
    }

    #[test]
    fn test_is_dash_marker() {
        assert!(is_dash_marker("-"));
        assert!(is_dash_marker("—"));
        assert!(!is_dash_marker("•"));
        assert!(!is_dash_marker("1."));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("• \tBuilt APIs"), "Built APIs");
        assert_eq!(clean_text("-- Led team"), "Led team");
        assert_eq!(clean_text("4) Tuned queries"), "Tuned queries");
        assert_eq!(clean_text("Grew revenue 5.5%"), "Grew revenue 5.5%");
        assert_eq!(clean_text("2020 launch"), "2020 launch");
        assert_eq!(clean_text("3.5x faster builds"), "3.5x faster builds");
        assert_eq!(clean_text("7."), "");
    }

    #[test]
    fn test_is_bullet_text() {
        assert!(is_bullet_text("• item"));
        assert!(is_bullet_text("—item"));
        assert!(is_bullet_text("7. item"));
        assert!(!is_bullet_text("item"));
        assert!(!is_bullet_text("   "));
    }

    #[test]
    fn test_extra_glyphs() {
        let glyphs = GlyphSet::with_extra(['➢', '•']);
        assert_eq!(glyphs, GlyphSet::with_extra(['➢']));

        assert!(glyphs.is_bullet_text("➢ Led migrations"));
        assert!(!is_bullet_text("➢ Led migrations"));
        assert_eq!(glyphs.extract_marker("➢\tLed").as_deref(), Some("➢"));
        assert_eq!(glyphs.clean_text("➢ Led migrations"), "Led migrations");
        assert_eq!(glyphs.clean_text("- Shipped"), "Shipped");
    }
}

use serde::Serialize;

/// Shown in place of the preview while the resume field is empty.
pub const EMPTY_PREVIEW_HINT: &str = "Resume preview will appear here...";

const BULLET_GLYPHS: [char; 3] = ['•', '-', '*'];

/// How one line of resume text is presented. Purely cosmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum PreviewLine {
    Spacer,
    Heading(String),
    ListItem(String),
    Paragraph(String),
}

/// Classifies each line of `text`. Empty input yields no lines.
pub fn render_preview(text: &str) -> Vec<PreviewLine> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(classify_line).collect()
}

fn classify_line(line: &str) -> PreviewLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return PreviewLine::Spacer;
    }
    if is_heading(trimmed) {
        return PreviewLine::Heading(trimmed.to_string());
    }
    if let Some(rest) = trimmed.strip_prefix(BULLET_GLYPHS) {
        return PreviewLine::ListItem(rest.trim_start().to_string());
    }
    PreviewLine::Paragraph(trimmed.to_string())
}

/// ALL-CAPS lines longer than four characters, or lines ending in a colon.
fn is_heading(trimmed: &str) -> bool {
    let shouting = trimmed.chars().count() > 4
        && trimmed
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_whitespace());
    shouting || trimmed.ends_with(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploaded_text_preview() {
        assert_eq!(
            render_preview("HELLO\nworld"),
            vec![
                PreviewLine::Heading("HELLO".to_string()),
                PreviewLine::Paragraph("world".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_lines_become_spacers() {
        let lines = render_preview("Name\n   \nMore");
        assert_eq!(lines[1], PreviewLine::Spacer);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_short_caps_are_not_headings() {
        assert_eq!(
            render_preview("CSE"),
            vec![PreviewLine::Paragraph("CSE".to_string())]
        );
    }

    #[test]
    fn test_caps_with_digits_are_not_headings() {
        assert_eq!(
            render_preview("HSC 2019"),
            vec![PreviewLine::Paragraph("HSC 2019".to_string())]
        );
    }

    #[test]
    fn test_colon_suffix_is_heading() {
        assert_eq!(
            render_preview("  Work Experience:  "),
            vec![PreviewLine::Heading("Work Experience:".to_string())]
        );
    }

    #[test]
    fn test_bullets_are_stripped() {
        assert_eq!(
            render_preview("• Built a library system\n-   Led a team\n*Tutored"),
            vec![
                PreviewLine::ListItem("Built a library system".to_string()),
                PreviewLine::ListItem("Led a team".to_string()),
                PreviewLine::ListItem("Tutored".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(render_preview("").is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(render_preview("SKILLS\n\n- Rust")).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"kind": "heading", "text": "SKILLS"},
                {"kind": "spacer"},
                {"kind": "list_item", "text": "Rust"}
            ])
        );
    }
}

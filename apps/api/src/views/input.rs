use dioxus::prelude::*;
use uuid::Uuid;

use crate::intake::preview::{render_preview, PreviewLine, EMPTY_PREVIEW_HINT};
use crate::intake::upload::ACCEPTED_EXTENSIONS;

/// What the input form currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDraft {
    pub text: String,
    pub target_role: String,
    /// Name of the last uploaded file, shown under the upload field.
    pub file_name: Option<String>,
}

/// Input form plus live preview. `busy` is the Analyzing phase: the form stays
/// visible but cannot be submitted again.
#[component]
pub fn InputPanel(session_id: Uuid, draft: InputDraft, busy: bool) -> Element {
    let submit_label = if busy { "Analyzing..." } else { "Analyze Resume" };

    rsx! {
        div { class: "columns",
            section { class: "card",
                h2 { "Resume Details" }
                form {
                    method: "post",
                    action: "/sessions/{session_id}/input",
                    enctype: "multipart/form-data",
                    label { r#for: "role", "Target Role / Opportunity *" }
                    input {
                        r#type: "text",
                        id: "role",
                        name: "targetRole",
                        required: true,
                        value: "{draft.target_role}",
                        placeholder: "e.g. Junior Web Developer, Bank Probationary Officer",
                        disabled: busy,
                    }
                    p { class: "hint-small", "Helping the AI understand your goal." }
                    label { r#for: "file-upload", "Upload or Paste Content *" }
                    input {
                        r#type: "file",
                        id: "file-upload",
                        name: "file",
                        accept: ACCEPTED_EXTENSIONS,
                        disabled: busy,
                    }
                    p { class: "hint-small", "TXT, PDF (Text) up to 2MB" }
                    if let Some(name) = draft.file_name.as_deref() {
                        p { class: "selected", "Selected: {name}" }
                    }
                    button {
                        r#type: "submit",
                        name: "action",
                        value: "load",
                        "formnovalidate": "formnovalidate",
                        disabled: busy,
                        "Load File"
                    }
                    textarea {
                        name: "text",
                        rows: "12",
                        required: true,
                        placeholder: "Paste your resume content here...",
                        disabled: busy,
                        "{draft.text}"
                    }
                    button {
                        r#type: "submit",
                        name: "action",
                        value: "preview",
                        "formnovalidate": "formnovalidate",
                        disabled: busy,
                        "Update Preview"
                    }
                    button {
                        r#type: "submit",
                        name: "action",
                        value: "analyze",
                        disabled: busy,
                        "{submit_label}"
                    }
                }
            }
            section { class: "card",
                h3 { "Live Preview" }
                div { class: "preview",
                    PreviewLines { text: draft.text.clone() }
                }
            }
        }
    }
}

#[component]
fn PreviewLines(text: String) -> Element {
    let lines = render_preview(&text);
    if lines.is_empty() {
        return rsx! {
            p { class: "hint", "{EMPTY_PREVIEW_HINT}" }
        };
    }

    rsx! {
        for line in lines {
            match line {
                PreviewLine::Spacer => rsx! { div { class: "spacer" } },
                PreviewLine::Heading(t) => rsx! { h4 { "{t}" } },
                PreviewLine::ListItem(t) => rsx! { li { "{t}" } },
                PreviewLine::Paragraph(t) => rsx! { p { "{t}" } },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(draft: InputDraft, busy: bool) -> String {
        dioxus_ssr::render_element(rsx! {
            InputPanel { session_id: Uuid::nil(), draft, busy }
        })
    }

    #[test]
    fn test_uploaded_txt_renders_heading_and_paragraph() {
        let draft = InputDraft {
            text: "HELLO\nworld".to_string(),
            file_name: Some("notes.txt".to_string()),
            ..InputDraft::default()
        };
        let html = render(draft, false);
        assert!(html.contains("<h4>HELLO</h4>"));
        assert!(html.contains("<p>world</p>"));
        assert!(html.contains("Selected: notes.txt"));
        assert!(html.contains(">HELLO\nworld</textarea>"));
    }

    #[test]
    fn test_bullets_render_as_list_items() {
        let draft = InputDraft {
            text: "SKILLS\n• Rust\n- SQL".to_string(),
            ..InputDraft::default()
        };
        let html = render(draft, false);
        assert!(html.contains("<li>Rust</li>"));
        assert!(html.contains("<li>SQL</li>"));
    }

    #[test]
    fn test_empty_draft_shows_hint() {
        let html = render(InputDraft::default(), false);
        assert!(html.contains("Resume preview will appear here..."));
        assert!(!html.contains("Selected:"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let draft = InputDraft {
            text: "<script>alert(1)</script>".to_string(),
            target_role: "\"><b>".to_string(),
            file_name: Some("<img src=x>.txt".to_string()),
        };
        let html = render(draft, false);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_busy_form_is_disabled() {
        let html = render(InputDraft::default(), true);
        assert!(html.contains("Analyzing..."));
        assert!(!html.contains("Analyze Resume"));
        assert!(html.contains("disabled"));
    }

    #[test]
    fn test_form_posts_to_session_input() {
        let html = render(InputDraft::default(), false);
        assert!(html.contains(&format!("/sessions/{}/input", Uuid::nil())));
        assert!(html.contains(r#"accept=".txt,.pdf,.docx""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
    }
}

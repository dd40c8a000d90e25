use serde::Serialize;
use tracing::debug;

/// Extensions the upload field advertises. Only `.txt` content is ever read.
pub const ACCEPTED_EXTENSIONS: &str = ".txt,.pdf,.docx";

const UNPARSED_NOTE: &str = "(Note: Automatic PDF parsing is disabled in this demo. \
Please copy-paste your resume content here for best results.)";

/// The outcome of an upload: the file name to display and the text that
/// replaces the resume field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedResume {
    pub file_name: String,
    pub text: String,
    /// `false` when `text` is the paste-it-yourself placeholder.
    pub extracted: bool,
}

/// Plain-text uploads are read verbatim; anything else becomes a placeholder.
pub fn ingest_upload(file_name: &str, content_type: Option<&str>, bytes: &[u8]) -> UploadedResume {
    if is_plain_text(file_name, content_type) {
        debug!("reading {} bytes of plain text from {file_name}", bytes.len());
        UploadedResume {
            file_name: file_name.to_string(),
            text: String::from_utf8_lossy(bytes).into_owned(),
            extracted: true,
        }
    } else {
        debug!("not parsing {file_name} ({content_type:?}), substituting placeholder");
        UploadedResume {
            file_name: file_name.to_string(),
            text: unparsed_placeholder(file_name),
            extracted: false,
        }
    }
}

pub fn unparsed_placeholder(file_name: &str) -> String {
    format!("[Loaded file: {file_name}]\n\n{UNPARSED_NOTE}")
}

fn is_plain_text(file_name: &str, content_type: Option<&str>) -> bool {
    let by_mime = content_type
        .map(|ct| ct.split(';').next().unwrap_or_default().trim())
        .is_some_and(|ct| ct.eq_ignore_ascii_case("text/plain"));
    by_mime || file_name.to_ascii_lowercase().ends_with(".txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_upload_becomes_placeholder() {
        let upload = ingest_upload("resume.pdf", Some("application/pdf"), b"%PDF-1.7 ...");
        assert_eq!(upload.file_name, "resume.pdf");
        assert!(!upload.extracted);
        assert_eq!(
            upload.text,
            "[Loaded file: resume.pdf]\n\n(Note: Automatic PDF parsing is disabled in this demo. \
             Please copy-paste your resume content here for best results.)"
        );
    }

    #[test]
    fn test_txt_upload_is_read_verbatim() {
        let upload = ingest_upload("notes.txt", None, b"HELLO\nworld");
        assert_eq!(upload.file_name, "notes.txt");
        assert_eq!(upload.text, "HELLO\nworld");
        assert!(upload.extracted);
    }

    #[test]
    fn test_text_plain_mime_wins_over_extension() {
        let upload = ingest_upload("resume", Some("text/plain; charset=utf-8"), b"Skills:");
        assert_eq!(upload.text, "Skills:");
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let upload = ingest_upload("CV.TXT", Some("application/octet-stream"), b"cv");
        assert!(upload.extracted);
    }

    #[test]
    fn test_docx_upload_becomes_placeholder() {
        let upload = ingest_upload("cv.docx", None, b"PK\x03\x04");
        assert!(upload.text.starts_with("[Loaded file: cv.docx]"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_rejected() {
        let upload = ingest_upload("cv.txt", None, &[b'o', b'k', 0xff]);
        assert!(upload.text.starts_with("ok"));
    }
}

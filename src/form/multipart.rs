//! `multipart/form-data` encoding of a [`FormState`]
//!
//! The whole body is produced up front so the same bytes can be posted
//! again when the scheduler answers with a redirect. `reqwest::multipart::Form`
//! is consumed by a request and picks its own boundary, so it cannot be replayed.

use crate::error::Result;
use crate::form::FormState;
use tracing::debug;

const CRLF: &[u8] = b"\r\n";

/// Encoded request body together with its boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedForm {
    boundary: String,
    body: Vec<u8>,
}

impl EncodedForm {
    /// Boundary separating the parts
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// `Content-Type` header value for the body
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encoded body bytes
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume into the body bytes
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Encode every field of `form` as one part, reading file sources now
pub fn encode(form: &FormState) -> Result<EncodedForm> {
    let boundary = format!("----------------skr{}", uuid::Uuid::new_v4().simple());
    encode_with_boundary(form, boundary)
}

/// Encode with a caller-chosen boundary
pub fn encode_with_boundary(form: &FormState, boundary: String) -> Result<EncodedForm> {
    let mut body = Vec::new();

    for (name, source) in form.iter() {
        let bytes = source.read_bytes()?;

        body.extend_from_slice(b"--");
        body.extend_from_slice(boundary.as_bytes());
        body.extend_from_slice(CRLF);

        let disposition = match source.file_name() {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                escape_quoted(name),
                escape_quoted(&file_name)
            ),
            None => format!(
                "Content-Disposition: form-data; name=\"{}\"",
                escape_quoted(name)
            ),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(CRLF);

        let content_type = if source.as_text().is_some() {
            format!("Content-Type: {}; charset=UTF-8", source.media_type())
        } else {
            format!("Content-Type: {}", source.media_type())
        };
        body.extend_from_slice(content_type.as_bytes());
        body.extend_from_slice(CRLF);
        body.extend_from_slice(CRLF);

        body.extend_from_slice(&bytes);
        body.extend_from_slice(CRLF);
    }

    body.extend_from_slice(b"--");
    body.extend_from_slice(boundary.as_bytes());
    body.extend_from_slice(b"--");
    body.extend_from_slice(CRLF);

    debug!(parts = form.len(), bytes = body.len(), "encoded multipart form");
    Ok(EncodedForm { boundary, body })
}

/// Quote-safe parameter value (RFC 7578 percent-encodes `"` and line breaks)
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::fields;
    use crate::types::RunProg;

    fn body_text(encoded: &EncodedForm) -> String {
        String::from_utf8(encoded.body().to_vec()).unwrap()
    }

    #[test]
    fn test_one_part_per_field_in_order() {
        let mut form = FormState::new(RunProg::GenericValidated);
        form.set_text(fields::EMAIL_ADDRESS, "a@b.c");

        let encoded = encode_with_boundary(&form, "XYZ".to_string()).unwrap();
        let text = body_text(&encoded);

        assert_eq!(text.matches("--XYZ\r\n").count(), 5);
        assert!(text.ends_with("--XYZ--\r\n"));
        let run_prog = text.find("name=\"RUN_PROG\"").unwrap();
        let email = text.find("name=\"Email_Address\"").unwrap();
        assert!(run_prog < email);
        assert!(text.contains(
            "Content-Disposition: form-data; name=\"Email_Address\"\r\n\
             Content-Type: text/plain; charset=UTF-8\r\n\r\na@b.c\r\n"
        ));
        assert_eq!(encoded.content_type(), "multipart/form-data; boundary=XYZ");
    }

    #[test]
    fn test_buffer_encoded_as_file_part() {
        let mut form = FormState::default();
        form.set_file_from_buffer(fields::UPLOAD_FILE, "input.txt", "TI  - Title\n");

        let text = body_text(&encode_with_boundary(&form, "B".to_string()).unwrap());
        assert!(text.contains(
            "name=\"UpLoad_File\"; filename=\"input.txt\"\r\nContent-Type: text/plain\r\n\r\nTI  - Title\n\r\n"
        ));
    }

    #[test]
    fn test_file_read_at_encode_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        let mut form = FormState::default();
        form.set_file(fields::UPLOAD_FILE, &path);

        assert!(encode(&form).is_err());

        std::fs::write(&path, "late content").unwrap();
        let text = body_text(&encode(&form).unwrap());
        assert!(text.contains("filename=\"sample.txt\""));
        assert!(text.contains("late content"));
    }

    #[test]
    fn test_random_boundary_is_used_consistently() {
        let form = FormState::default();
        let encoded = encode(&form).unwrap();
        let text = body_text(&encoded);
        assert!(text.starts_with(&format!("--{}\r\n", encoded.boundary())));
        assert_ne!(encoded.boundary(), encode(&form).unwrap().boundary());
    }

    #[test]
    fn test_quotes_in_names_are_escaped() {
        assert_eq!(escape_quoted("a\"b\nc"), "a%22b%0Ac");
    }
}

//! `multipart/form-data` body encoding.
//!
//! Framing per part:
//!
//! ```text
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<name>"[; filename="<file>"]\r\n
//! [Content-Type: <type>\r\n]
//! \r\n
//! <value>\r\n
//! ```
//!
//! followed by `--<boundary>--\r\n`. Values are written verbatim, so binary
//! file content needs no transfer encoding.

use std::fmt;

use uuid::Uuid;

/// Delimiter token separating the parts of one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(String);

impl Boundary {
    /// A fresh random token; callers generate one per request.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the request's `content-type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.0)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One named part of a form.
#[derive(Debug, Clone)]
pub enum FormPart<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        content: &'a [u8],
    },
}

/// Encode `parts` in order, each delimited by `boundary`.
pub fn encode(boundary: &Boundary, parts: &[FormPart<'_>]) -> Vec<u8> {
    let payload: usize = parts
        .iter()
        .map(|p| match p {
            FormPart::Text { value, .. } => value.len(),
            FormPart::File { content, .. } => content.len(),
        })
        .sum();
    let mut body = Vec::with_capacity(payload + parts.len() * 128 + 64);

    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match part {
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                filename,
                content_type,
                content,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

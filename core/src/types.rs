//! Domain types for the pets API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates.

use serde::{Deserialize, Serialize};

/// A single pet record from `GET /pets`.
///
/// Every field is required; a missing or mistyped field fails the whole list.
/// `image_url` keeps the server's text unchanged, relative references included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub title: String,
    pub description: String,
    #[serde(rename = "url")]
    pub image_url: String,
    pub created: String,
}

/// A server-issued destination for exactly one upload.
///
/// Not `Clone`: `PetsClient::build_upload_image` consumes the target, so a
/// target obtained for one attempt cannot be handed to another.
#[derive(Debug, PartialEq, Eq)]
pub struct UploadTarget {
    url: String,
}

impl UploadTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn into_string(self) -> String {
        self.url
    }
}

/// The form fields of one upload, assembled just before the POST.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub app_id: String,
    /// Echoed back to the server verbatim. The only caller in practice passes
    /// the upload target URL here.
    pub original_url: String,
    pub image: Vec<u8>,
}

impl UploadRequest {
    pub fn new(app_id: impl Into<String>, original_url: impl Into<String>, image: Vec<u8>) -> Self {
        Self {
            app_id: app_id.into(),
            original_url: original_url.into(),
            image,
        }
    }
}

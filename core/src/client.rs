//! Stateless HTTP request builder and response parser for the pets API.
//!
//! # Design
//! `PetsClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping this layer
//! deterministic and free of I/O.

use serde_json::Value;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::{self, Boundary, FormPart};
use crate::types::{Pet, UploadRequest, UploadTarget};

/// Filename announced for every uploaded image.
pub const UPLOAD_FILENAME: &str = "image.jpg";
/// Content type announced for every uploaded image.
pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// Synchronous, stateless client for the pets API.
#[derive(Debug, Clone)]
pub struct PetsClient {
    base_url: String,
}

impl PetsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_pets(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/pets", self.base_url))
    }

    pub fn build_request_upload_target(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/upload", self.base_url))
    }

    /// Build the multipart POST for one upload, consuming its target.
    pub fn build_upload_image(
        &self,
        target: UploadTarget,
        request: &UploadRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.build_upload_image_with_boundary(target, request, &Boundary::generate())
    }

    /// Like `build_upload_image` but with a caller-chosen boundary.
    pub fn build_upload_image_with_boundary(
        &self,
        target: UploadTarget,
        request: &UploadRequest,
        boundary: &Boundary,
    ) -> Result<HttpRequest, ApiError> {
        validate_app_id(&request.app_id)?;
        let url = Url::parse(target.as_str()).map_err(|e| {
            ApiError::Validation(format!("upload target {:?} is not a URL: {e}", target.as_str()))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::Validation(format!(
                "upload target must be http(s), got {:?}",
                url.scheme()
            )));
        }

        let body = multipart::encode(
            boundary,
            &[
                FormPart::Text {
                    name: "appid",
                    value: &request.app_id,
                },
                FormPart::Text {
                    name: "original",
                    value: &request.original_url,
                },
                FormPart::File {
                    name: "file",
                    filename: UPLOAD_FILENAME,
                    content_type: UPLOAD_CONTENT_TYPE,
                    content: &request.image,
                },
            ],
        );

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: target.into_string(),
            headers: vec![("content-type".to_string(), boundary.content_type())],
            body: Some(body),
        })
    }

    /// Decode the pet list. The status code is not consulted; an error page
    /// fails to decode like any other malformed body.
    pub fn parse_list_pets(&self, response: HttpResponse) -> Result<Vec<Pet>, ApiError> {
        serde_json::from_slice(&response.body).map_err(ApiError::Decode)
    }

    pub fn parse_upload_target(&self, response: HttpResponse) -> Result<UploadTarget, ApiError> {
        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|e| ApiError::Protocol(format!("body is not JSON: {e}")))?;
        match value.get("url") {
            Some(Value::String(url)) => Ok(UploadTarget::new(url.clone())),
            Some(_) => Err(ApiError::Protocol("field `url` is not a string".to_string())),
            None => Err(ApiError::Protocol("missing field `url`".to_string())),
        }
    }

    /// Only the status is inspected: any 2xx confirms the upload.
    pub fn parse_upload_image(&self, response: HttpResponse) -> Result<bool, ApiError> {
        if response.is_success() {
            return Ok(true);
        }
        Err(ApiError::Server {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }
}

pub(crate) fn validate_app_id(app_id: &str) -> Result<(), ApiError> {
    if app_id.trim().is_empty() {
        return Err(ApiError::Validation("app id must not be empty".to_string()));
    }
    Ok(())
}

//! Async execution of the pets API over an injected `Transport`.
//!
//! Each call is a single attempt: no retries, no timeout beyond the
//! transport's own, nothing cached between calls.

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::client::{validate_app_id, PetsClient};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Pet, UploadRequest, UploadTarget};

#[derive(Debug, Clone)]
pub struct PetsApi<T> {
    client: PetsClient,
    transport: T,
}

impl<T: Transport> PetsApi<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: PetsClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &PetsClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(skip(self))]
    pub async fn list_pets(&self) -> Result<Vec<Pet>, ApiError> {
        let response = self.round_trip(self.client.build_list_pets()).await?;
        let pets = self.client.parse_list_pets(response)?;
        debug!(count = pets.len(), "fetched pets");
        Ok(pets)
    }

    #[instrument(skip(self))]
    pub async fn request_upload_target(&self) -> Result<UploadTarget, ApiError> {
        let response = self
            .round_trip(self.client.build_request_upload_target())
            .await?;
        self.client.parse_upload_target(response)
    }

    #[instrument(skip(self, request), fields(app_id = %request.app_id, len = request.image.len()))]
    pub async fn upload_image(
        &self,
        target: UploadTarget,
        request: &UploadRequest,
    ) -> Result<bool, ApiError> {
        let http_request = self.client.build_upload_image(target, request)?;
        let response = self.round_trip(http_request).await?;
        self.client.parse_upload_image(response).inspect_err(|e| {
            warn!(error = %e, "upload rejected");
        })
    }

    /// Upload the file at `path`. An unreadable file fails before any
    /// request is sent.
    pub async fn upload_image_file(
        &self,
        target: UploadTarget,
        app_id: &str,
        original_url: &str,
        path: impl AsRef<Path>,
    ) -> Result<bool, ApiError> {
        let image = read_image(path.as_ref()).await?;
        let request = UploadRequest::new(app_id, original_url, image);
        self.upload_image(target, &request).await
    }

    /// Full upload flow: read the image, fetch a fresh target, then post to
    /// it with the target URL echoed back as `original`.
    pub async fn upload(&self, app_id: &str, path: impl AsRef<Path>) -> Result<bool, ApiError> {
        validate_app_id(app_id)?;
        let image = read_image(path.as_ref()).await?;
        let target = self.request_upload_target().await?;
        let request = UploadRequest::new(app_id, target.as_str(), image);
        self.upload_image(target, &request).await
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let url = request.url.clone();
        debug!(method, %url, "sending request");
        match self.transport.execute(request).await {
            Ok(response) => {
                debug!(method, %url, status = response.status, "received response");
                Ok(response)
            }
            Err(e) => {
                warn!(method, %url, error = %e, "transport failure");
                Err(ApiError::Network(e))
            }
        }
    }
}

async fn read_image(path: &Path) -> Result<Vec<u8>, ApiError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::Validation(format!("cannot read image {}: {e}", path.display())))
}

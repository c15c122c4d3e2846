//! Terminal front end for the pets service.
//!
//! Set PETS_API_URL to point at another host (defaults to the public
//! hackathon server). PETS_APP_ID tags uploads; PETS_CACHE_DIR is where the
//! image is staged before upload.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pets_core::{filter_pets, ApiError, ImageStore, Pet, PetsApi, Transport};
use serde::Serialize;

pub const DEFAULT_API_URL: &str = "https://eulerity-hackathon.appspot.com";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub cache_dir: PathBuf,
}

impl Config {
    /// Default staging directory when PETS_CACHE_DIR is unset.
    pub fn default_cache_dir() -> PathBuf {
        std::env::temp_dir().join("pets-cli")
    }
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Fetch the pet list and keep the records matching `search`.
pub async fn list<T: Transport>(api: &PetsApi<T>, search: Option<&str>) -> anyhow::Result<Vec<Pet>> {
    let pets = api.list_pets().await.context("Failed to fetch pets")?;
    let query = search.unwrap_or_default();
    Ok(filter_pets(&pets, query).into_iter().cloned().collect())
}

#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub success: bool,
    pub staged: PathBuf,
}

/// Stage `file` in the image store, then run the upload flow from there.
pub async fn upload<T: Transport>(
    api: &PetsApi<T>,
    store: &ImageStore,
    app_id: &str,
    file: &Path,
) -> anyhow::Result<UploadOutcome> {
    let image = std::fs::read(file).map_err(|e| {
        ApiError::Validation(format!("cannot read image {}: {e}", file.display()))
    })?;
    let staged = store
        .save(&image)
        .with_context(|| format!("Failed to stage {}", file.display()))?;
    tracing::info!(source = %file.display(), staged = %staged.display(), "uploading image");
    let success = api.upload(app_id, &staged).await.context("Image upload failed")?;
    Ok(UploadOutcome { success, staged })
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

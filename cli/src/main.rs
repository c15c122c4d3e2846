//! `pets`: list and upload pet images from the terminal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pets_cli::{init_tracing, print_json, Config, DEFAULT_API_URL};
use pets_core::{ImageStore, PetsApi, ReqwestTransport};

#[derive(Parser)]
#[command(name = "pets", about = "Browse and upload pet images")]
struct Cli {
    /// Base URL of the pets API
    #[arg(long, env = "PETS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Directory where the image is staged before upload
    #[arg(long, env = "PETS_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pets, optionally filtered by title or description
    List {
        /// Case-insensitive search text
        #[arg(long)]
        search: Option<String>,
    },
    /// Upload an image tagged with an app id
    Upload {
        /// Path to the image file
        file: PathBuf,
        /// Identifier attached to the upload
        #[arg(long, env = "PETS_APP_ID")]
        app_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config {
        api_url: cli.api_url,
        cache_dir: cli.cache_dir.unwrap_or_else(Config::default_cache_dir),
    };
    tracing::debug!(?config, "resolved configuration");

    let api = PetsApi::new(&config.api_url, ReqwestTransport::new());

    match cli.command {
        Commands::List { search } => {
            let pets = pets_cli::list(&api, search.as_deref()).await?;
            print_json(&pets)?;
        }
        Commands::Upload { file, app_id } => {
            let store = ImageStore::new(&config.cache_dir);
            let outcome = pets_cli::upload(&api, &store, &app_id, &file).await?;
            print_json(&outcome)?;
        }
    }

    Ok(())
}

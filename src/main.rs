use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recommendify_server::catalog::load_catalog;
use recommendify_server::recommend::{Recommender, ScalerSource};
use recommendify_server::server::{run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the catalog CSV file.
    #[clap(value_parser = parse_path)]
    pub catalog_csv: PathBuf,

    /// Path to the trained scaler artifact.
    #[clap(long, default_value = "models/standard_scaler.json", value_parser = parse_path)]
    pub scaler_path: PathBuf,

    /// Path to the trained KMeans model artifact.
    #[clap(long, default_value = "models/kmeans_model.json", value_parser = parse_path)]
    pub kmeans_path: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!("Loading catalog from {:?}...", cli_args.catalog_csv);
    let catalog = Arc::new(load_catalog(&cli_args.catalog_csv)?);

    let recommender = Arc::new(Recommender::initialize(
        catalog.clone(),
        &cli_args.scaler_path,
        &cli_args.kmeans_path,
    ));
    match recommender.scaler_source() {
        ScalerSource::Artifact => info!("Scaling with the trained artifact"),
        ScalerSource::FittedFromCatalog => {
            info!("Scaling with a transform fitted on the loaded catalog")
        }
    }
    if recommender.clustering_available() {
        info!("Cluster-restricted recommendations are available");
    } else {
        info!("Cluster-restricted recommendations will fall back to full-catalog search");
    }

    info!("Ready to serve at port {}!", cli_args.port);
    run_server(
        catalog,
        recommender,
        cli_args.logging_level,
        cli_args.port,
        cli_args.frontend_dir_path,
    )
    .await
}

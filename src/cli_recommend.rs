use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recommendify_server::catalog::load_catalog;
use recommendify_server::recommend::{Recommender, SeedSong, DEFAULT_RESULT_COUNT};

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

/// Parses a seed given as "Name:Year", e.g. "Blinding Lights:2020".
fn parse_seed(s: &str) -> Result<SeedSong> {
    let Some((name, year)) = s.rsplit_once(':') else {
        bail!("Expected \"Name:Year\", got \"{s}\"");
    };
    let year = year
        .trim()
        .parse()
        .with_context(|| format!("Invalid year in \"{s}\""))?;
    Ok(SeedSong {
        name: name.trim().to_owned(),
        year,
    })
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the catalog CSV file.
    #[clap(value_parser = parse_path)]
    pub catalog_csv: PathBuf,

    /// Seed songs, each given as "Name:Year".
    #[clap(required = true, value_parser = parse_seed)]
    pub seeds: Vec<SeedSong>,

    /// Path to the trained scaler artifact.
    #[clap(long, default_value = "models/standard_scaler.json", value_parser = parse_path)]
    pub scaler_path: PathBuf,

    /// Path to the trained KMeans model artifact.
    #[clap(long, default_value = "models/kmeans_model.json", value_parser = parse_path)]
    pub kmeans_path: PathBuf,

    /// Number of songs to recommend.
    #[clap(short = 'n', long, default_value_t = DEFAULT_RESULT_COUNT)]
    pub count: usize,

    /// Restrict the search to the seeds' cluster.
    #[clap(long)]
    pub clusters: bool,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    println!(
        "Loading catalog at {}...",
        cli_args.catalog_csv.display()
    );
    let catalog = Arc::new(load_catalog(&cli_args.catalog_csv)?);
    let recommender =
        Recommender::initialize(catalog, &cli_args.scaler_path, &cli_args.kmeans_path);

    let outcome = recommender.recommend(&cli_args.seeds, cli_args.count, cli_args.clusters);
    if !outcome.success {
        bail!(
            "{}",
            outcome
                .error_message
                .unwrap_or_else(|| "Recommendation failed".to_string())
        );
    }

    if let Some(message) = &outcome.error_message {
        println!("Note: {message}");
    }
    println!("Recommended songs:");
    for (i, song) in outcome.data.iter().enumerate() {
        println!(
            "{}. {} ({}) by {}",
            i + 1,
            song.name,
            song.year,
            song.artists.join(", ")
        );
    }
    Ok(())
}

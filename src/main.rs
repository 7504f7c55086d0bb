//! apiforge CLI entrypoint
//! Parses command-line arguments and dispatches to the generation pipelines.
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use apiforge::core::options::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT_MS, SdkOptions};
use apiforge::generators;

#[derive(Parser)]
#[command(name = "apiforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate per-record server route stubs next to the spec manifest
    Routes {
        /// Spec directory holding spec.yaml (absolute path)
        #[arg(long)]
        spec_dir: PathBuf,
        /// Restrict generation to the named records (repeatable)
        #[arg(long = "only")]
        only: Vec<String>,
    },
    /// Generate per-record data-model stubs next to the spec manifest
    Models {
        /// Spec directory holding spec.yaml (absolute path)
        #[arg(long)]
        spec_dir: PathBuf,
        /// Restrict generation to the named records (repeatable)
        #[arg(long = "only")]
        only: Vec<String>,
    },
    /// Generate the consolidated browser-transport client SDK module
    Client {
        /// Spec directory holding spec.yaml (absolute path)
        #[arg(long)]
        spec_dir: PathBuf,
        /// Output directory for the SDK module (absolute path)
        #[arg(long)]
        out_dir: PathBuf,
        /// API host the generated client talks to
        #[arg(long)]
        host: String,
        /// API version segment of the base URL
        #[arg(long, default_value = DEFAULT_API_VERSION)]
        api_version: String,
        /// URL scheme, http or https
        #[arg(long, default_value = "http")]
        protocol: String,
        /// Request timeout in milliseconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,
        /// Restrict generation to the named records (repeatable)
        #[arg(long = "only")]
        only: Vec<String>,
    },
    /// Generate the consolidated server-side proxy SDK module
    Server {
        /// Spec directory holding spec.yaml (absolute path)
        #[arg(long)]
        spec_dir: PathBuf,
        /// Output directory for the SDK module (absolute path)
        #[arg(long)]
        out_dir: PathBuf,
        /// Absolute application root anchoring stub require paths
        #[arg(long)]
        root_path: String,
        /// Restrict generation to the named records (repeatable)
        #[arg(long = "only")]
        only: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Routes { spec_dir, only } => {
            let summary = generators::routes::generate_routes(spec_dir, only)
                .await
                .context("route stub generation failed")?;
            info!(
                written = summary.written,
                skipped = summary.skipped,
                failed = summary.failed,
                "done"
            );
        }
        Commands::Models { spec_dir, only } => {
            let summary = generators::models::generate_models(spec_dir, only)
                .await
                .context("model stub generation failed")?;
            info!(
                written = summary.written,
                skipped = summary.skipped,
                failed = summary.failed,
                "done"
            );
        }
        Commands::Client {
            spec_dir,
            out_dir,
            host,
            api_version,
            protocol,
            timeout_ms,
            only,
        } => {
            let options = SdkOptions {
                host: Some(host.clone()),
                protocol: protocol.clone(),
                api_version: api_version.clone(),
                timeout_ms: *timeout_ms,
                root_path: None,
            };
            let target =
                generators::client::generate_client_sdk(spec_dir, out_dir, &options, only)
                    .await
                    .context("client SDK generation failed")?;
            info!(path = %target.display(), "done");
        }
        Commands::Server {
            spec_dir,
            out_dir,
            root_path,
            only,
        } => {
            let options = SdkOptions {
                root_path: Some(root_path.clone()),
                ..Default::default()
            };
            let target =
                generators::server::generate_server_sdk(spec_dir, out_dir, &options, only)
                    .await
                    .context("server SDK generation failed")?;
            info!(path = %target.display(), "done");
        }
    }
    Ok(())
}

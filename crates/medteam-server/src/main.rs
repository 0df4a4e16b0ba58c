//! Medteam - multidisciplinary diagnostics from case report PDFs
//!
//! `medteam serve` exposes the pipeline over HTTP for an external
//! automation tool. `medteam run --pdf <path>` processes one case locally
//! and writes the diagnosis and rendered report to disk.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medteam_config::AppConfig;
use medteam_llm::{ChatBackend, OpenAiClient};
use medteam_server::{router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "medteam")]
#[command(about = "Multidisciplinary medical diagnostics over a hosted language model")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "MEDTEAM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides HOST)
        #[arg(long)]
        host: Option<String>,
    },

    /// Run the full pipeline on one case report
    Run {
        /// Case report PDF
        #[arg(long)]
        pdf: PathBuf,

        /// Output directory
        #[arg(long, default_value = "results")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before the subscriber, so RUST_LOG from .env applies
    let dotenv = medteam_config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match dotenv {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
    }

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    if config.llm.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; model calls will fail");
    }

    match cli.command {
        Command::Serve { port, host } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(config).await
        }
        Command::Run { pdf, out } => run(config, pdf, out).await,
    }
}

fn backend(config: &AppConfig) -> Result<Arc<dyn ChatBackend>> {
    let client = OpenAiClient::new(&config.llm).context("building model client")?;
    Ok(Arc::new(client))
}

async fn serve(config: AppConfig) -> Result<()> {
    config
        .ensure_directories()
        .context("creating upload and report directories")?;

    let addr = config.bind_addr();
    let backend = backend(&config)?;
    info!(
        model = backend.model(),
        upload_dir = %config.upload_dir.display(),
        report_dir = %config.report_dir.display(),
        "Starting Medical Diagnostics API"
    );

    let app = router(AppState::new(config, backend));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run(config: AppConfig, pdf: PathBuf, out: PathBuf) -> Result<()> {
    if !pdf.exists() {
        anyhow::bail!("case report not found: {}", pdf.display());
    }

    let backend = backend(&config)?;
    let state = AppState::new(config, backend);
    let case = state
        .pipeline()
        .run(&pdf)
        .await
        .with_context(|| format!("processing {}", pdf.display()))?;

    tokio::fs::create_dir_all(&out)
        .await
        .with_context(|| format!("creating {}", out.display()))?;

    let txt_path = out.join("final_diagnosis.txt");
    tokio::fs::write(&txt_path, case.outcome.summary.as_str()).await?;
    let pdf_path = out.join("Final_Medical_Report.pdf");
    tokio::fs::write(&pdf_path, &case.pdf).await?;

    println!("Saved: {}", txt_path.display());
    println!("Saved PDF: {}", pdf_path.display());
    Ok(())
}

use anyhow::{Context, Result};
use audioink::{
    create_router, AppState, AudioArtifact, Config, Pipeline, TranscriptionClient,
    TranscriptionOutcome,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "audioink", version, about = "Transcribe audio through a remote speech-to-text service")]
struct Cli {
    /// Config file, extension optional; environment variables override it
    #[arg(long, global = true, default_value = "config/audioink")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a single audio file and print the text
    Transcribe {
        /// Audio file (mp3, mp4, mpeg, mpga, m4a, wav, webm)
        file: PathBuf,

        /// Also save the transcript as a plain-text file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Serve the HTTP API
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config).context("Failed to load configuration")?;

    info!("audioink v{}", env!("CARGO_PKG_VERSION"));
    info!("Transcription endpoint: {}", cfg.endpoint_url);
    info!("Upload limit: {} bytes", cfg.max_file_size_bytes);
    if cfg.api_key.is_empty() {
        warn!("No API key configured; set API_KEY or api_key in the config file");
    }

    let client = TranscriptionClient::new(cfg.client_config())?;
    let pipeline = Pipeline::new(cfg.validation_policy(), Arc::new(client));

    match cli.command {
        Command::Transcribe { file, output } => {
            let artifact = AudioArtifact::from_path(&file)?;

            match pipeline.run(Some(artifact)).await {
                TranscriptionOutcome::Success { text } => {
                    println!("{}", text);

                    if let Some(path) = output {
                        std::fs::write(&path, text.as_bytes()).with_context(|| {
                            format!("Failed to write transcript: {}", path.display())
                        })?;
                        info!("Transcript saved to {}", path.display());
                    }

                    Ok(())
                }
                TranscriptionOutcome::Failure { kind, message } => {
                    anyhow::bail!("Transcription failed ({}): {}", kind, message)
                }
            }
        }
        Command::Serve => {
            let addr = format!("{}:{}", cfg.http.bind, cfg.http.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            info!("HTTP server listening on {}", addr);

            axum::serve(listener, create_router(AppState::new(pipeline)))
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                    info!("Shutting down");
                })
                .await
                .context("HTTP server failed")?;

            Ok(())
        }
    }
}

use anyhow::{bail, Context, Result};
use clap::Parser;
use speechbuf_core::{AppConfig, AudioEncoding};
use speechbuf_recognizer::{ClientRegistry, CredentialRef, Recognizer};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "speechbuf", about = "Transcribe raw audio buffers with Google Speech-to-Text")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language code override, e.g. en-US
    #[arg(short, long)]
    language: Option<String>,

    /// Sample rate override in hertz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Encoding override, e.g. LINEAR16 or FLAC
    #[arg(long)]
    encoding: Option<AudioEncoding>,

    /// Raw audio files to transcribe
    #[arg(required = true)]
    audio: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {path:?}"))?,
        None => AppConfig::default(),
    };
    if let Some(language) = cli.language {
        config.recognition.language_code = language;
    }
    if let Some(rate) = cli.sample_rate {
        config.recognition.sample_rate_hertz = rate;
    }
    if let Some(encoding) = cli.encoding {
        config.recognition.encoding = encoding;
    }

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        );
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let credentials =
        CredentialRef::from_env().context("speech recognizer is not configured")?;
    let client = ClientRegistry::new()
        .create(&config.client, &credentials)
        .with_context(|| format!("failed to create '{}' speech client", config.client.backend))?;
    let recognizer = Recognizer::with_credentials(config.recognition, credentials, client)
        .context("invalid recognition settings")?;

    let mut handles = Vec::with_capacity(cli.audio.len());
    for path in cli.audio {
        let recognizer = recognizer.clone();
        handles.push(tokio::spawn(async move {
            let result = async {
                let buffer = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("failed to read {path:?}"))?;
                recognizer
                    .recognize(&buffer)
                    .await
                    .with_context(|| format!("recognition failed for {path:?}"))
            }
            .await;
            (path, result)
        }));
    }

    let total = handles.len();
    let mut failed = 0;
    for handle in handles {
        let (path, result) = handle.await.context("recognition task panicked")?;
        match result {
            Ok(transcript) => println!("{}: {transcript}", path.display()),
            Err(e) => {
                tracing::error!("{e:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {total} recognitions failed");
    }
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod chat;

use crate::core::AppConfig;

/// Chat with an LLM persona of your choosing. Configured through
/// CHATGPT_CLI_* environment variables, type `exit` at any prompt to
/// quit.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {}

// Logs go to stderr so they never interleave with the conversation
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let _args = Cli::parse();
    init_tracing();

    let config = AppConfig::from_env()?;
    chat::run(&config).await
}

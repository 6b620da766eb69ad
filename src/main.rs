use anyhow::Result;
use chatgpt_cli::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}

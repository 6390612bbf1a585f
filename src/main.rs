use anyhow::Result;
use bank_ledger::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    Cli::parse().run().await
}

use clap::Parser;
use dotnet_docs::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotnet_docs::tracing::init_with_level(if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    });

    run(cli).await.inspect_err(|e| {
        tracing::error!("dotnet-docs failed: {:#}", e);
    })
}

//! onepager CLI binary entry point
//!
//! This is a thin wrapper that calls the library's `run_cli()` function.

use anyhow::Result;
use onepager_cli::run_cli;

#[tokio::main]
async fn main() -> Result<()> {
    run_cli().await
}

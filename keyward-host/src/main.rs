//! Keyward command line host
//!
//! Keeps one product's license state in a local SQLite file and talks to
//! the licensing server on demand:
//! 1. `configure` and `activate` a key
//! 2. `check-update` / `release-info` once the license is active
//! 3. `run` to keep re-validating the key once a day
//!
//! Usage:
//!   keyward configure --server-url https://licenses.example.com --product-id 7
//!   keyward --site-url https://shop.example.com activate ABCD-1234

use anyhow::Result;
use clap::Parser;
use keyward_host::{init_logging, run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let output = run(cli).await?;
    println!("{output}");
    Ok(())
}

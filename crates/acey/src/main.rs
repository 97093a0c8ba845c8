//! Acey - Entry Point
//!
//! | Mode | Command | Description |
//! |------|---------|-------------|
//! | **Daemon** | `acey` | Runs the scheduler until Ctrl-C |
//! | **Single cycle** | `acey --once` | Runs one cycle and prints status JSON |

use acey::{Cli, run};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let status = run(&cli).await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

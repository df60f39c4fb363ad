pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "par")]
#[command(about = "Browse, fetch and upload to buckets through pre-authenticated request URLs")]
pub struct Args {
    /// Path to the par config directory (defaults to ~/.par)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}

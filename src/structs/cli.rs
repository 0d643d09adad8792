use std::path::PathBuf;
use clap::Parser;
use crate::enums::commands::Commands;

#[derive(Parser)]
#[clap(name = "spectrace")]
#[clap(about = "Firmware change and compliance analysis", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ~/spectrace/config.toml)
    #[clap(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

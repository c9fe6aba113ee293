//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Air Canvas - draw in the air from recorded hand landmarks
#[derive(Parser, Debug)]
#[command(name = "air-canvas")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON-lines landmark recording onto a canvas
    Replay {
        /// Recording file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for canvas.png, the gallery and captures
        #[arg(short, long, default_value = "air-canvas-out")]
        output: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

//! CLI argument definitions using clap
//!
//! Commands:
//! - marketboard serve [--config <path>] [--port <n>] [--data-dir <dir>] [--in-memory]
//! - marketboard init [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Marketboard - classifieds marketplace backend
#[derive(Parser, Debug)]
#[command(name = "marketboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path of the configuration file to create
        #[arg(long, default_value = "./marketboard.json")]
        config: PathBuf,
    },

    /// Start the HTTP API
    Serve {
        /// Path to configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,

        /// Override the data directory for json storage
        #[arg(long, conflicts_with = "in_memory")]
        data_dir: Option<PathBuf>,

        /// Keep everything in memory and leave classified creation open
        #[arg(long)]
        in_memory: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

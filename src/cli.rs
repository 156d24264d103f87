//! Command-line interface for wordgrid.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wordgrid - word-grid puzzle rules engine
#[derive(Parser, Debug)]
#[command(name = "wordgrid")]
#[command(about = "Dictionary, tile bag and board rules for word-grid puzzles", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file to use instead of the platform config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Encoded word list to use instead of the configured one
    #[arg(long, global = true)]
    pub words: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look words up; `*` matches any single letter
    Check {
        /// Words to look up
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Encode a newline-separated word list from stdin to stdout
    Encode,

    /// Print the number of words in the dictionary
    Stats,

    /// Let a greedy player lay tiles until it gets stuck
    Demo {
        /// Word seeded on the bottom row
        #[arg(long, default_value = "START")]
        opening: String,

        /// Stop after this many plays
        #[arg(long, default_value = "10")]
        plays: usize,

        /// Seed for the bag shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
}

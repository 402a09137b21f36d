mod help_text;

use crate::selection_file::Toggle;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Record keep/delete patterns over trees of files
#[derive(Parser, Debug)]
#[command(name = "cleanpick", version, about, long_about = help_text::ROOT_LONG_ABOUT)]
pub struct Cli {
    /// Change to DIRECTORY before doing anything
    #[arg(short = 'C', value_name = "DIRECTORY", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase log verbosity (-v for info, -vv for debug). Takes precedence over RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Set the log level explicitly. Takes precedence over RUST_LOG.
    #[arg(long, value_name = "LEVEL", conflicts_with = "verbose", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk a directory and write its keep/delete pattern as JSON
    #[command(long_about = help_text::PICK_LONG_ABOUT)]
    Pick {
        /// Example directory to record
        #[arg(value_name = "ROOT", default_value = ".")]
        root: PathBuf,

        /// Where to write the pattern (".json" is appended if missing)
        #[arg(
            short,
            long,
            value_name = "DEST",
            required_unless_present = "dry_run",
            conflicts_with = "dry_run"
        )]
        output: Option<PathBuf>,

        #[command(flatten)]
        toggles: ToggleArgs,

        /// Print the pattern to stdout instead of writing a file
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the effective check state of paths under ROOT
    State {
        /// Directory the toggles and PATHs are relative to
        #[arg(long, value_name = "ROOT", default_value = ".")]
        root: PathBuf,

        #[command(flatten)]
        toggles: ToggleArgs,

        /// Paths to resolve, relative to ROOT
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print the records of an existing pattern file
    Show {
        /// Pattern file to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct ToggleArgs {
    /// TOML file of toggles, applied in order before any --set
    #[arg(long, value_name = "FILE")]
    pub selection: Option<PathBuf>,

    /// Toggle PATH (relative to ROOT) to STATE: checked/delete,
    /// unchecked/keep or inherited/partial. Applied in order; may repeat.
    #[arg(short, long = "set", value_name = "PATH=STATE")]
    pub set: Vec<Toggle>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

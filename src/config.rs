//! CLI surface (spec §13), grounded on the teacher's `why` binary's
//! `clap::Parser`-derived `Cli`.

use clap::Parser;
use std::path::PathBuf;

/// Verbosity level, same shape as the teacher's log-level argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Script to run.
    pub file: PathBuf,

    #[arg(long, value_enum, default_value = "error")]
    pub verbosity: LogLevel,

    /// Print the token stream and exit without evaluating.
    #[arg(long)]
    pub dump_tokens: bool,

    /// Print the parsed AST and exit without evaluating.
    #[arg(long)]
    pub dump_ast: bool,

    /// Directory the running script may read files from (repeatable).
    #[arg(long = "allow-read")]
    pub allow_read: Vec<PathBuf>,

    /// Directory the running script may write files to (repeatable).
    #[arg(long = "allow-write")]
    pub allow_write: Vec<PathBuf>,

    /// Directory the running script may import modules or spawn processes
    /// from (repeatable).
    #[arg(long = "allow-execute")]
    pub allow_execute: Vec<PathBuf>,
}

//! Command-line support for jql
//!
//! The pieces behind the `jql` binary, exposed so they can be driven from
//! tests or embedded in other tools: JSON conversion, configuration loading
//! and the record-at-a-time streaming loop.

mod config;
mod convert;
mod run;

pub use config::Config;
pub use convert::json_to_value;
pub use run::{OutputOptions, run, run_compiled};

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{CompileError, EvalError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("couldn't decode JSON value #{record}: {source}")]
    Decode {
        record: usize,
        source: serde_json::Error,
    },

    #[error("couldn't evaluate query for value #{record}: {source}")]
    Eval { record: usize, source: EvalError },

    #[error("couldn't read config file {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

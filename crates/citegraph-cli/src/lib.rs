//! # citegraph
//!
//! Command-line driver for the citation chart pipeline: loads the
//! observation log, rebuilds the wide-format CSV and renders every chart for
//! the configured themes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::{App, Outcome};
pub use cli::{Args, Command};
pub use error::{CliError, CliResult};

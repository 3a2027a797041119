//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Turn a citation history into cumulative, top-K and per-publication charts
#[derive(Parser, Debug)]
#[command(name = "citegraph", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "CITEGRAPH_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the configuration
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Rebuild the wide CSV and render every chart for the selected themes
    Render {
        /// Theme to render; repeat for several. Defaults to the configured selection
        #[arg(long = "theme", value_name = "NAME")]
        themes: Vec<String>,

        /// Number of publications in the ranked chart
        #[arg(long, value_name = "N")]
        top_k: Option<usize>,

        /// Skip the per-publication charts
        #[arg(long)]
        no_individual: bool,
    },

    /// Only rebuild the wide-format CSV
    Reshape,

    /// Append the rows of another long-format CSV to the observation log
    Append {
        /// Long-format CSV with `Date,Title,Citations` rows
        #[arg(long, value_name = "PATH")]
        from: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_render_flags() {
        let args = Args::try_parse_from([
            "citegraph",
            "--log-level",
            "debug",
            "render",
            "--theme",
            "white",
            "--theme",
            "dark",
            "--top-k",
            "3",
            "--no-individual",
        ])
        .unwrap();

        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(
            args.command,
            Command::Render {
                themes: vec!["white".to_string(), "dark".to_string()],
                top_k: Some(3),
                no_individual: true,
            }
        );
    }

    #[test]
    fn test_append_requires_source() {
        assert!(Args::try_parse_from(["citegraph", "append"]).is_err());

        let args = Args::try_parse_from(["citegraph", "append", "--from", "new.csv"]).unwrap();
        assert_eq!(
            args.command,
            Command::Append {
                from: PathBuf::from("new.csv")
            }
        );
    }
}

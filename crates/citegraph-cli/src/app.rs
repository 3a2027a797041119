//! Command implementations shared by the binary and the tests.

use crate::cli::Command;
use crate::error::{CliError, CliResult};
use citegraph_config::Config;
use citegraph_graphs::{
    reshape, BitmapChartRenderer, ChartDataAssembler, CitationPipeline, ObservationStore,
    PipelineOptions, PipelineReport, PlottersFontProbe, ThemeCatalog,
};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// What a finished command produced.
#[derive(Debug)]
pub enum Outcome {
    /// Charts were rendered.
    Rendered(PipelineReport),
    /// The wide CSV was rewritten.
    Reshaped {
        /// Where the CSV went.
        path: PathBuf,
        /// Rows in the CSV.
        publications: usize,
        /// Date columns in the CSV.
        dates: usize,
    },
    /// Rows were added to the observation log.
    Appended {
        /// Number of rows added.
        rows: usize,
    },
}

/// The application: a validated configuration plus the commands that use it.
pub struct App {
    config: Config,
}

impl App {
    /// Creates a new application instance.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one subcommand.
    pub async fn run(&self, command: Command) -> CliResult<Outcome> {
        match command {
            Command::Render {
                themes,
                top_k,
                no_individual,
            } => {
                let config = with_render_overrides(&self.config, themes, top_k, no_individual)?;
                let report = render(&config).await?;
                let failed = report.failures().count();
                if failed > 0 {
                    return Err(CliError::PartialFailure {
                        failed,
                        total: report.outcomes.len(),
                    });
                }
                Ok(Outcome::Rendered(report))
            }
            Command::Reshape => reshape_only(&self.config),
            Command::Append { from } => append(&self.config, from),
        }
    }
}

/// Fold `render` flags into a copy of the configuration and re-validate it
pub fn with_render_overrides(
    config: &Config,
    themes: Vec<String>,
    top_k: Option<usize>,
    no_individual: bool,
) -> CliResult<Config> {
    let mut config = config.clone();
    if !themes.is_empty() {
        config.themes.selected = themes;
    }
    if let Some(k) = top_k {
        config.chart.top_k = k;
    }
    if no_individual {
        config.output.individual_charts = false;
    }
    config
        .validate_all()
        .map_err(citegraph_config::ConfigError::from)?;
    Ok(config)
}

#[instrument(skip_all, fields(themes = ?config.themes.selected))]
async fn render(config: &Config) -> CliResult<PipelineReport> {
    let themes = ThemeCatalog::from_config(&config.themes)?.select(&config.themes.selected)?;

    // Snapshot the log before any rendering starts
    let observations = ObservationStore::load(&config.input.history_path)?.snapshot();

    let renderer = BitmapChartRenderer::from_config(&config.chart, &PlottersFontProbe);
    info!("Rendering with font family '{}'", renderer.font_family());

    let pipeline = CitationPipeline::new(
        renderer,
        ChartDataAssembler::from_config(&config.chart),
        PipelineOptions::from_config(config),
    );
    let report = pipeline.run(&observations, &themes).await?;

    if report.top_k_clamped {
        warn!(
            "Only {} publications available for a top {} chart",
            report.publications, config.chart.top_k
        );
    }
    for failure in report.failures() {
        warn!(
            "Chart {} ({}) failed: {}",
            failure.target,
            failure.theme,
            failure.error.as_deref().unwrap_or_default()
        );
    }
    Ok(report)
}

fn reshape_only(config: &Config) -> CliResult<Outcome> {
    let observations = ObservationStore::load(&config.input.history_path)?.snapshot();
    let matrix = reshape(&observations)?;
    let path = PathBuf::from(&config.input.wide_output_path);
    matrix.write_csv(&path)?;

    Ok(Outcome::Reshaped {
        path,
        publications: matrix.publication_count(),
        dates: matrix.date_count(),
    })
}

fn append(config: &Config, from: PathBuf) -> CliResult<Outcome> {
    let incoming = ObservationStore::load(&from)?.snapshot();
    let rows =
        ObservationStore::append_to_file(&config.input.history_path, incoming.as_slice())?;
    info!(
        "Appended {} rows from {} to {}",
        rows,
        from.display(),
        config.input.history_path
    );
    Ok(Outcome::Appended { rows })
}

//! End-to-end chart generation for one batch run

use crate::aggregator::{cumulative, top_k};
use crate::assembler::{ChartBundle, ChartDataAssembler};
use crate::identifiers::IdentifierAllocator;
use crate::renderer::ChartRenderer;
use crate::reshape::reshape;
use crate::theme::Theme;
use citegraph_common::{ObservationSet, Result};
use citegraph_config::Config;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Progress information for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineProgress {
    pub stage: PipelineStage,
    pub completed: usize,
    pub total: usize,
    pub message: String,
}

/// Stages of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Reshaping,
    Persisting,
    Assembling,
    Rendering,
    Complete,
}

/// Where a run writes its files
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub output_dir: PathBuf,
    pub wide_output_path: PathBuf,
    pub cumulative_stem: String,
    pub top_stem: String,
    pub individual_dir: String,
    pub individual_charts: bool,
    pub top_k: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output.directory),
            wide_output_path: PathBuf::from(&config.input.wide_output_path),
            cumulative_stem: config.output.cumulative_stem.clone(),
            top_stem: config.output.top_stem.clone(),
            individual_dir: config.output.individual_dir.clone(),
            individual_charts: config.output.individual_charts,
            top_k: config.chart.top_k,
        }
    }
}

/// Result of rendering one chart with one theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub theme: String,
    /// Identifier of the chart, as carried in its bundle
    pub target: String,
    pub path: PathBuf,
    pub error: Option<String>,
}

impl ArtifactOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub wide_csv: PathBuf,
    pub publications: usize,
    pub dates: usize,
    pub duplicates_resolved: usize,
    pub top_k_clamped: bool,
    pub outcomes: Vec<ArtifactOutcome>,
}

impl PipelineReport {
    pub fn rendered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Where an assembled chart goes, relative to the output directory
#[derive(Debug, Clone)]
enum Placement {
    /// `<dir>/<stem>_<theme>.png`
    Summary(String),
    /// `<dir>/<individual_dir>/<theme>/<identifier>.png`
    Individual(String),
}

#[derive(Debug, Clone)]
struct PlannedChart {
    bundle: ChartBundle,
    placement: Placement,
}

/// Runs reshape, aggregation, assembly and rendering for a set of themes
pub struct CitationPipeline<R: ChartRenderer> {
    renderer: R,
    assembler: ChartDataAssembler,
    options: PipelineOptions,
    progress_tx: Option<mpsc::UnboundedSender<PipelineProgress>>,
}

impl<R: ChartRenderer> CitationPipeline<R> {
    pub fn new(renderer: R, assembler: ChartDataAssembler, options: PipelineOptions) -> Self {
        Self {
            renderer,
            assembler,
            options,
            progress_tx: None,
        }
    }

    /// Add progress reporting to the pipeline
    pub fn with_progress_reporting(mut self) -> (Self, mpsc::UnboundedReceiver<PipelineProgress>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.progress_tx = Some(tx);
        (self, rx)
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Send progress update if reporting is enabled
    fn send_progress(&self, stage: PipelineStage, completed: usize, total: usize, message: String) {
        if let Some(ref tx) = self.progress_tx {
            let _ = tx.send(PipelineProgress {
                stage,
                completed,
                total,
                message,
            });
        }
    }

    /// Generate every chart for every theme from a snapshot of the log
    ///
    /// An empty snapshot or a failure to write the wide CSV aborts the run.
    /// Individual chart failures are recorded in the report and the run goes on.
    #[instrument(skip_all, fields(observations = observations.len(), themes = themes.len()))]
    pub async fn run(&self, observations: &ObservationSet, themes: &[Theme]) -> Result<PipelineReport> {
        self.send_progress(PipelineStage::Reshaping, 0, 1, "Reshaping observations".to_string());
        let matrix = reshape(observations)?;
        info!(
            "Reshaped {} observations into {} publications over {} dates",
            observations.len(),
            matrix.publication_count(),
            matrix.date_count()
        );

        self.send_progress(PipelineStage::Persisting, 0, 1, "Writing wide CSV".to_string());
        matrix.write_csv(&self.options.wide_output_path)?;

        self.send_progress(PipelineStage::Assembling, 0, 1, "Assembling chart data".to_string());
        let mut charts = Vec::new();

        charts.push(PlannedChart {
            bundle: self
                .assembler
                .cumulative_chart(&cumulative(&matrix), self.options.cumulative_stem.clone())?,
            placement: Placement::Summary(self.options.cumulative_stem.clone()),
        });

        let mut top_k_clamped = false;
        match top_k(&matrix, self.options.top_k) {
            Ok(subset) => {
                top_k_clamped = subset.was_clamped();
                charts.push(PlannedChart {
                    bundle: self
                        .assembler
                        .top_k_chart(&subset, self.options.top_stem.clone())?,
                    placement: Placement::Summary(self.options.top_stem.clone()),
                });
            }
            Err(e) if e.is_recoverable() => warn!("Skipping top-K chart: {}", e),
            Err(e) => return Err(e),
        }

        if self.options.individual_charts {
            let mut identifiers = IdentifierAllocator::new();
            for (title, cells) in matrix.rows() {
                let identifier = identifiers.allocate(title);
                let bundle = self.assembler.publication_chart(
                    title,
                    cells,
                    matrix.dates(),
                    identifier.clone(),
                )?;
                charts.push(PlannedChart {
                    bundle,
                    placement: Placement::Individual(identifier),
                });
            }
        }
        debug!("Planned {} charts per theme", charts.len());

        let total = charts.len() * themes.len();
        let completed = AtomicUsize::new(0);

        // Themes run side by side; charts within a theme go one after another
        let per_theme = join_all(
            themes
                .iter()
                .map(|theme| self.render_theme(&charts, theme, &completed, total)),
        )
        .await;
        let outcomes: Vec<ArtifactOutcome> = per_theme.into_iter().flatten().collect();

        let report = PipelineReport {
            wide_csv: self.options.wide_output_path.clone(),
            publications: matrix.publication_count(),
            dates: matrix.date_count(),
            duplicates_resolved: matrix.duplicates_resolved(),
            top_k_clamped,
            outcomes,
        };

        self.send_progress(
            PipelineStage::Complete,
            total,
            total,
            format!("Rendered {} of {} charts", report.rendered(), total),
        );
        info!(
            "Pipeline complete: {} rendered, {} failed",
            report.rendered(),
            report.failures().count()
        );
        Ok(report)
    }

    async fn render_theme(
        &self,
        charts: &[PlannedChart],
        theme: &Theme,
        completed: &AtomicUsize,
        total: usize,
    ) -> Vec<ArtifactOutcome> {
        let mut outcomes = Vec::with_capacity(charts.len());

        for chart in charts {
            let path = self.output_path(&chart.placement, &theme.name);
            let error = match self.renderer.render(&chart.bundle, theme, &path).await {
                Ok(()) => None,
                Err(e) => {
                    warn!("Failed to render {}: {}", path.display(), e);
                    Some(e.to_string())
                }
            };

            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            self.send_progress(
                PipelineStage::Rendering,
                done,
                total,
                format!("{} ({})", chart.bundle.target, theme.name),
            );

            outcomes.push(ArtifactOutcome {
                theme: theme.name.clone(),
                target: chart.bundle.target.clone(),
                path,
                error,
            });
        }

        outcomes
    }

    fn output_path(&self, placement: &Placement, theme: &str) -> PathBuf {
        let dir: &Path = &self.options.output_dir;
        match placement {
            Placement::Summary(stem) => dir.join(format!("{}_{}.png", stem, theme)),
            Placement::Individual(identifier) => dir
                .join(&self.options.individual_dir)
                .join(theme)
                .join(format!("{}.png", identifier)),
        }
    }
}

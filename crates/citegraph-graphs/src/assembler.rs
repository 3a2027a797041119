//! Packages derived series into render-ready chart bundles

use crate::interpolation::{smooth, SmoothedCurve, DEFAULT_SAMPLES};
use crate::{CumulativeSeries, RankedSubset};
use chrono::NaiveDate;
use citegraph_common::utils::{format_iso_date, is_gridline_day, truncate_with_ellipsis};
use citegraph_common::{CiteGraphError, Result};
use citegraph_config::{ChartConfig, FillPolicy};
use tracing::debug;

/// How a series is drawn
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// Two or more knots, drawn as a sampled PCHIP line
    Smooth(SmoothedCurve),
    /// A single knot, drawn as a marker
    Points(Vec<(f64, f64)>),
    /// Nothing left to draw after absent cells were skipped
    Empty,
}

/// One labelled line of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    /// `(date index, citations)` pairs after the fill policy was applied
    pub knots: Vec<(f64, f64)>,
    pub curve: Curve,
}

/// Everything a renderer needs for one chart
///
/// `labels` is index-aligned with the x positions of every series, and each
/// entry of `gridlines` is a valid index into `labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBundle {
    pub title: String,
    /// Stable identifier used to name the output file
    pub target: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub gridlines: Vec<usize>,
    pub series: Vec<ChartSeries>,
}

impl ChartBundle {
    pub fn is_multi_series(&self) -> bool {
        self.series.len() > 1
    }

    /// Largest y among knots and sampled points, 0 for an empty chart
    pub fn y_max(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| {
                let sampled: &[(f64, f64)] = match &s.curve {
                    Curve::Smooth(curve) => curve.points(),
                    Curve::Points(points) => points.as_slice(),
                    Curve::Empty => &[],
                };
                s.knots.iter().chain(sampled).map(|(_, y)| *y)
            })
            .fold(0.0, f64::max)
    }
}

/// Builds [`ChartBundle`]s from aggregated series
#[derive(Debug, Clone)]
pub struct ChartDataAssembler {
    fill_policy: FillPolicy,
    samples: usize,
    y_label: String,
    legend_label_chars: usize,
}

impl Default for ChartDataAssembler {
    fn default() -> Self {
        Self::new(FillPolicy::Zero, DEFAULT_SAMPLES)
    }
}

impl ChartDataAssembler {
    pub fn new(fill_policy: FillPolicy, samples: usize) -> Self {
        Self {
            fill_policy,
            samples,
            y_label: "CITATIONS".to_string(),
            legend_label_chars: 40,
        }
    }

    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            fill_policy: config.fill_policy,
            samples: config.samples,
            y_label: config.y_label.clone(),
            legend_label_chars: config.legend_label_chars,
        }
    }

    pub fn fill_policy(&self) -> FillPolicy {
        self.fill_policy
    }

    /// `YYYY-MM-DD` axis labels
    pub fn labels(dates: &[NaiveDate]) -> Vec<String> {
        dates.iter().map(|d| format_iso_date(*d)).collect()
    }

    /// Indices of dates falling on the 1st or 15th of a month
    pub fn gridlines(dates: &[NaiveDate]) -> Vec<usize> {
        dates
            .iter()
            .enumerate()
            .filter(|(_, d)| is_gridline_day(**d))
            .map(|(i, _)| i)
            .collect()
    }

    /// Assemble a chart from labelled rows of cells aligned to `dates`
    pub fn assemble(
        &self,
        title: impl Into<String>,
        target: impl Into<String>,
        dates: &[NaiveDate],
        rows: Vec<(String, Vec<Option<u64>>)>,
    ) -> Result<ChartBundle> {
        let mut series = Vec::with_capacity(rows.len());
        for (label, cells) in rows {
            citegraph_common::ensure!(
                cells.len() == dates.len(),
                "series '{}' has {} cells for {} dates",
                label,
                cells.len(),
                dates.len()
            );
            series.push(self.build_series(label, &cells)?);
        }

        let bundle = ChartBundle {
            title: title.into(),
            target: target.into(),
            y_label: self.y_label.clone(),
            labels: Self::labels(dates),
            gridlines: Self::gridlines(dates),
            series,
        };
        debug!(
            "Assembled chart '{}' with {} series over {} dates",
            bundle.title,
            bundle.series.len(),
            bundle.labels.len()
        );
        Ok(bundle)
    }

    /// "TOTAL CITATIONS" chart of the column sums
    pub fn cumulative_chart(
        &self,
        series: &CumulativeSeries,
        target: impl Into<String>,
    ) -> Result<ChartBundle> {
        let cells = series.totals().iter().map(|t| Some(*t)).collect();
        self.assemble(
            "TOTAL CITATIONS",
            target,
            series.dates(),
            vec![("Total".to_string(), cells)],
        )
    }

    /// "THE TOP {k}" chart with one truncated legend label per publication
    pub fn top_k_chart(&self, subset: &RankedSubset, target: impl Into<String>) -> Result<ChartBundle> {
        let rows = subset
            .entries()
            .iter()
            .map(|e| {
                (
                    truncate_with_ellipsis(&e.title, self.legend_label_chars),
                    e.cells.clone(),
                )
            })
            .collect();
        self.assemble(
            format!("THE TOP {}", subset.len()),
            target,
            subset.dates(),
            rows,
        )
    }

    /// Single-publication chart titled with the upper-cased publication title
    pub fn publication_chart(
        &self,
        title: &str,
        cells: &[Option<u64>],
        dates: &[NaiveDate],
        target: impl Into<String>,
    ) -> Result<ChartBundle> {
        self.assemble(
            title.to_uppercase(),
            target,
            dates,
            vec![(title.to_string(), cells.to_vec())],
        )
    }

    fn build_series(&self, label: String, cells: &[Option<u64>]) -> Result<ChartSeries> {
        let knots: Vec<(f64, f64)> = match self.fill_policy {
            FillPolicy::Zero => cells
                .iter()
                .enumerate()
                .map(|(i, c)| (i as f64, c.unwrap_or(0) as f64))
                .collect(),
            FillPolicy::Skip => cells
                .iter()
                .enumerate()
                .filter_map(|(i, c)| c.map(|v| (i as f64, v as f64)))
                .collect(),
        };

        let curve = match knots.len() {
            0 => Curve::Empty,
            1 => Curve::Points(knots.clone()),
            _ => match smooth(&knots, self.samples) {
                Ok(curve) => Curve::Smooth(curve),
                Err(CiteGraphError::InsufficientData { .. }) => Curve::Points(knots.clone()),
                Err(e) => return Err(e),
            },
        };

        Ok(ChartSeries { label, knots, curve })
    }
}

//! Chart rendering trait and the plotters bitmap implementation

use crate::assembler::{ChartBundle, Curve};
use crate::theme::{resolve_font, FontProbe, Theme};
use citegraph_common::{CiteGraphError, Result};
use citegraph_config::ChartConfig;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::Path;
use tracing::{debug, info};

/// Trait for drawing a [`ChartBundle`] with a theme to a file
#[async_trait::async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Render `bundle` with `theme` to `path`, creating parent directories
    ///
    /// Failures are reported as [`CiteGraphError::RenderIo`] naming `path`.
    async fn render(&self, bundle: &ChartBundle, theme: &Theme, path: &Path) -> Result<()>;
}

/// PNG renderer on plotters' `BitMapBackend`
#[derive(Debug, Clone)]
pub struct BitmapChartRenderer {
    width: u32,
    height: u32,
    font_family: String,
}

impl Default for BitmapChartRenderer {
    fn default() -> Self {
        Self::new(1200, 700)
    }
}

impl BitmapChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            font_family: "sans-serif".to_string(),
        }
    }

    /// Size from configuration, font chosen by probing the configured candidates
    pub fn from_config(config: &ChartConfig, probe: &dyn FontProbe) -> Self {
        let available = probe.available(&config.font_candidates);
        Self::new(config.width, config.height).with_font(resolve_font(
            &config.font_candidates,
            &available,
            &config.fallback_font,
        ))
    }

    pub fn with_font(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    fn draw(&self, bundle: &ChartBundle, theme: &Theme, path: &Path) -> Result<()> {
        let background = RGBColor::from(theme.background);
        let text = RGBColor::from(theme.text);
        let edge = RGBColor::from(theme.edge);
        let grid = RGBColor::from(theme.grid);
        let font = self.font_family.as_str();

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&background)?;

        let x_max = bundle.labels.len().saturating_sub(1).max(1) as f64;
        let y_max = (bundle.y_max() * 1.1).max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption(&bundle.title, (font, 28).into_font().color(&text))
            .margin(20)
            .x_label_area_size(90)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

        let labels = &bundle.labels;
        let date_label = |x: &f64| {
            let index = x.round();
            if (x - index).abs() < 1e-6 && index >= 0.0 {
                labels.get(index as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(grid)
            .bold_line_style(grid)
            .axis_style(edge)
            .x_labels(labels.len().min(24))
            .x_label_formatter(&date_label)
            .x_label_style(
                (font, 12)
                    .into_font()
                    .transform(FontTransform::Rotate90)
                    .color(&text),
            )
            .y_label_style((font, 14).into_font().color(&text))
            .y_desc(&bundle.y_label)
            .axis_desc_style((font, 16).into_font().color(&text))
            .draw()?;

        // Reference lines on the 1st and 15th of each month
        for &index in &bundle.gridlines {
            let x = index as f64;
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(x, 0.0), (x, y_max)],
                grid.stroke_width(1),
            )))?;
        }

        let series_count = bundle.series.len();
        for (i, series) in bundle.series.iter().enumerate() {
            let color = RGBColor::from(theme.series_color(i, series_count));

            let annotation = match &series.curve {
                Curve::Smooth(curve) => {
                    let annotation = chart.draw_series(LineSeries::new(
                        curve.points().iter().copied(),
                        color.stroke_width(2),
                    ))?;
                    Some(annotation)
                }
                Curve::Points(points) => Some(chart.draw_series(
                    points.iter().map(|p| Circle::new(*p, 4, color.filled())),
                )?),
                Curve::Empty => None,
            };

            if let (Some(annotation), true) = (annotation, bundle.is_multi_series()) {
                annotation.label(series.label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }
        }

        if bundle.is_multi_series() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(background.mix(0.8))
                .border_style(edge)
                .label_font((font, 13).into_font().color(&text))
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ChartRenderer for BitmapChartRenderer {
    async fn render(&self, bundle: &ChartBundle, theme: &Theme, path: &Path) -> Result<()> {
        let target = path.display().to_string();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CiteGraphError::render_io_with_source("Failed to create output directory", e)
                    .for_target(target.clone())
            })?;
        }

        debug!("Rendering '{}' with theme '{}'", bundle.title, theme.name);
        // Rasterizing is CPU bound; keep it off the async workers
        let renderer = self.clone();
        let (bundle, theme, owned_path) = (bundle.clone(), theme.clone(), path.to_path_buf());
        tokio::task::spawn_blocking(move || renderer.draw(&bundle, &theme, &owned_path))
            .await
            .map_err(|e| {
                CiteGraphError::render_io_with_source("Render task failed", e)
                    .for_target(target.clone())
            })?
            .map_err(|e| match e {
                CiteGraphError::RenderIo { .. } => e.for_target(target.clone()),
                other => CiteGraphError::render_io_with_source("Chart rendering failed", other)
                    .for_target(target.clone()),
            })?;

        info!("Rendered chart to {}", target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ChartDataAssembler;
    use crate::theme::PlottersFontProbe;
    use crate::{cumulative, reshape, top_k};
    use citegraph_common::test_utils::{create_temp_dir, two_paper_scenario};
    use std::collections::HashSet;

    struct NoFonts;

    impl FontProbe for NoFonts {
        fn is_available(&self, _family: &str) -> bool {
            false
        }
    }

    struct Only(HashSet<&'static str>);

    impl FontProbe for Only {
        fn is_available(&self, family: &str) -> bool {
            self.0.contains(family)
        }
    }

    /// Rendering needs a system font; without one the error must still name the target
    fn assert_rendered_or_render_io(result: Result<()>, path: &Path) {
        match result {
            Ok(()) => {
                let metadata = std::fs::metadata(path).expect("rendered file exists");
                assert!(metadata.len() > 0, "rendered file is empty");
            }
            Err(CiteGraphError::RenderIo { target, .. }) => {
                assert_eq!(target.as_deref(), Some(path.display().to_string().as_str()));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_font_from_config() {
        let config = ChartConfig::default();

        let renderer = BitmapChartRenderer::from_config(&config, &NoFonts);
        assert_eq!(renderer.font_family(), "sans-serif");

        let renderer = BitmapChartRenderer::from_config(&config, &Only(["xkcd"].into_iter().collect()));
        assert_eq!(renderer.font_family(), "xkcd");
    }

    #[tokio::test]
    async fn test_render_single_series() {
        let dir = create_temp_dir();
        let path = dir.path().join("charts").join("cumulative_white.png");
        let matrix = reshape(&two_paper_scenario()).unwrap();
        let bundle = ChartDataAssembler::default()
            .cumulative_chart(&cumulative(&matrix), "cumulative")
            .unwrap();

        let renderer = BitmapChartRenderer::new(400, 300);
        let result = renderer.render(&bundle, &Theme::white(), &path).await;
        assert_rendered_or_render_io(result, &path);
    }

    #[tokio::test]
    async fn test_render_multi_series_dark() {
        let dir = create_temp_dir();
        let path = dir.path().join("top_dark.png");
        let matrix = reshape(&two_paper_scenario()).unwrap();
        let bundle = ChartDataAssembler::default()
            .top_k_chart(&top_k(&matrix, 5).unwrap(), "top")
            .unwrap();

        let config = ChartConfig {
            width: 400,
            height: 300,
            ..ChartConfig::default()
        };
        let renderer = BitmapChartRenderer::from_config(&config, &PlottersFontProbe);
        let result = renderer.render(&bundle, &Theme::dark(), &path).await;
        assert_rendered_or_render_io(result, &path);
    }

    #[tokio::test]
    async fn test_unwritable_target_is_render_io() {
        let dir = create_temp_dir();
        // A regular file where a directory is needed
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("chart.png");

        let matrix = reshape(&two_paper_scenario()).unwrap();
        let bundle = ChartDataAssembler::default()
            .cumulative_chart(&cumulative(&matrix), "cumulative")
            .unwrap();

        let err = BitmapChartRenderer::new(400, 300)
            .render(&bundle, &Theme::light(), &path)
            .await
            .unwrap_err();
        match err {
            CiteGraphError::RenderIo { target, .. } => {
                assert_eq!(target, Some(path.display().to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

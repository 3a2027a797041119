//! Chart data derivation and rendering for citation histories
//!
//! Data flows leaf-first through the modules of this crate:
//! [`store`] holds the long-format log, [`reshape`] pivots it into a
//! [`WideMatrix`], [`aggregator`] derives cumulative and ranked views,
//! [`interpolation`] smooths series, [`assembler`] packages chart bundles and
//! [`renderer`] draws them. [`pipeline`] ties a full run together.

pub mod aggregator;
pub mod assembler;
pub mod identifiers;
pub mod interpolation;
pub mod pipeline;
pub mod renderer;
pub mod reshape;
pub mod store;
pub mod theme;

pub use aggregator::{cumulative, top_k, CumulativeSeries, RankedEntry, RankedSubset};
pub use assembler::{ChartBundle, ChartDataAssembler, ChartSeries, Curve};
pub use identifiers::{derive_stem, IdentifierAllocator};
pub use interpolation::{smooth, SmoothedCurve, DEFAULT_SAMPLES};
pub use pipeline::{
    ArtifactOutcome, CitationPipeline, PipelineOptions, PipelineProgress, PipelineReport,
    PipelineStage,
};
pub use renderer::{BitmapChartRenderer, ChartRenderer};
pub use reshape::{reshape, WideMatrix};
pub use store::ObservationStore;
pub use theme::{resolve_font, FontProbe, PlottersFontProbe, Rgb, Theme, ThemeCatalog};

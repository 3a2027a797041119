//! Append-only long-format observation log backed by CSV

use citegraph_common::{CiteGraphError, Observation, ObservationSet, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// In-memory copy of the observation log
///
/// Runs work on a [`snapshot`](Self::snapshot) taken at start, so rows
/// appended afterwards never leak into a run in progress.
#[derive(Debug, Clone, Default)]
pub struct ObservationStore {
    observations: ObservationSet,
    source: Option<PathBuf>,
}

impl ObservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_observations(observations: impl Into<ObservationSet>) -> Self {
        Self {
            observations: observations.into(),
            source: None,
        }
    }

    /// Read a long-format `Date,Title,Citations` file
    ///
    /// A missing file or a file without data rows is a [`CiteGraphError::MissingInput`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if !path.exists() {
            return Err(CiteGraphError::missing_input_at(
                "observation log not found",
                display,
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut observations = ObservationSet::new();
        for record in reader.deserialize::<Observation>() {
            observations.push(record?);
        }

        if observations.is_empty() {
            return Err(CiteGraphError::missing_input_at(
                "observation log has no data rows",
                display,
            ));
        }

        info!("Loaded {} observations", observations.len());
        Ok(Self {
            observations,
            source: Some(path.to_path_buf()),
        })
    }

    /// Extend the in-memory log, keeping arrival order
    pub fn append(&mut self, observations: impl IntoIterator<Item = Observation>) {
        let before = self.observations.len();
        self.observations.extend(observations);
        debug!("Appended {} observations", self.observations.len() - before);
    }

    /// Owned copy of the log as it is right now
    pub fn snapshot(&self) -> ObservationSet {
        self.observations.clone()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// File the store was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Append rows to a log file, creating it with a header when new or empty
    ///
    /// All rows are serialized before the file is touched and written with a
    /// single call, so a failing row never leaves a partial record behind.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), rows = observations.len()))]
    pub fn append_to_file(path: impl AsRef<Path>, observations: &[Observation]) -> Result<usize> {
        let path = path.as_ref();
        if observations.is_empty() {
            return Ok(0);
        }

        let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(Vec::new());
        for observation in observations {
            writer.serialize(observation)?;
        }
        let buffer = writer
            .into_inner()
            .map_err(|e| CiteGraphError::Io(e.into_error()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(&buffer)?;
        file.flush()?;

        info!("Appended {} rows to observation log", observations.len());
        Ok(observations.len())
    }
}

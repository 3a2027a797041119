//! Long-to-wide pivot of the observation log

use chrono::NaiveDate;
use citegraph_common::utils::{format_iso_date, parse_iso_date};
use citegraph_common::{CiteGraphError, Observation, ObservationSet, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Dense publication × date matrix
///
/// Rows keep the order in which titles first appeared in the log. Columns
/// follow the global date axis in ascending order. A cell is `None` when no
/// observation exists for the pair, which is distinct from an observed zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideMatrix {
    titles: Vec<String>,
    dates: Vec<NaiveDate>,
    cells: Vec<Vec<Option<u64>>>,
    duplicates_resolved: usize,
}

impl WideMatrix {
    pub(crate) fn from_parts(
        titles: Vec<String>,
        dates: Vec<NaiveDate>,
        cells: Vec<Vec<Option<u64>>>,
    ) -> Self {
        Self {
            titles,
            dates,
            cells,
            duplicates_resolved: 0,
        }
    }

    /// Global date axis, ascending
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Publication titles in first-seen order
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Iterate `(title, cells)` pairs in row order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<u64>])> {
        self.titles
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    pub fn row(&self, title: &str) -> Option<&[Option<u64>]> {
        self.titles
            .iter()
            .position(|t| t == title)
            .map(|i| self.cells[i].as_slice())
    }

    pub fn cell(&self, title: &str, date: NaiveDate) -> Option<u64> {
        let column = self.dates.binary_search(&date).ok()?;
        self.row(title).and_then(|row| row[column])
    }

    pub fn publication_count(&self) -> usize {
        self.titles.len()
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    /// Number of cells overwritten by a later observation of the same pair
    pub fn duplicates_resolved(&self) -> usize {
        self.duplicates_resolved
    }

    /// Write the wide table: `Title,<date>...`, one row per publication, empty cell for absent
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;

        let mut header = Vec::with_capacity(self.dates.len() + 1);
        header.push("Title".to_string());
        header.extend(self.dates.iter().map(|d| format_iso_date(*d)));
        writer.write_record(&header)?;

        for (title, row) in self.rows() {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(title.to_string());
            record.extend(row.iter().map(|c| c.map(|v| v.to_string()).unwrap_or_default()));
            writer.write_record(&record)?;
        }
        writer.flush()?;

        info!(
            "Wrote wide matrix with {} publications and {} dates",
            self.titles.len(),
            self.dates.len()
        );
        Ok(())
    }

    /// Read a wide table previously written by [`write_csv`](Self::write_csv)
    ///
    /// Titles are kept verbatim, surrounding whitespace included.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        citegraph_common::ensure!(
            headers.get(0) == Some("Title"),
            "wide table must start with a Title column"
        );

        let dates = headers
            .iter()
            .skip(1)
            .map(parse_iso_date)
            .collect::<Result<Vec<_>>>()?;
        citegraph_common::ensure!(
            dates.windows(2).all(|w| w[0] < w[1]),
            "wide table date columns must be strictly ascending"
        );

        let mut titles = Vec::new();
        let mut cells = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let title = record.get(0).unwrap_or_default().to_string();

            let row = record
                .iter()
                .skip(1)
                .map(|value| {
                    let value = value.trim();
                    if value.is_empty() {
                        Ok(None)
                    } else {
                        value.parse::<u64>().map(Some).map_err(|e| {
                            CiteGraphError::validation_field(
                                format!("line {}: invalid citation count '{}': {}", line, value, e),
                                "Citations",
                            )
                        })
                    }
                })
                .collect::<Result<Vec<_>>>()?;

            titles.push(title);
            cells.push(row);
        }

        if titles.is_empty() || dates.is_empty() {
            return Err(CiteGraphError::no_data(format!(
                "wide table {} holds no observations",
                path.display()
            )));
        }

        Ok(Self::from_parts(titles, dates, cells))
    }

    /// Re-pivot into long format, skipping absent cells
    ///
    /// Observations are emitted row by row, dates ascending within a row.
    pub fn to_long(&self) -> ObservationSet {
        self.rows()
            .flat_map(|(title, row)| {
                self.dates.iter().zip(row).filter_map(move |(date, cell)| {
                    cell.map(|citations| Observation::new(*date, title, citations))
                })
            })
            .collect()
    }
}

/// Pivot observations into a [`WideMatrix`]
///
/// Arrival order does not matter for the axis. A repeated `(title, date)` pair
/// keeps the value that arrived last.
#[instrument(skip_all, fields(observations = observations.len()))]
pub fn reshape(observations: &ObservationSet) -> Result<WideMatrix> {
    if observations.is_empty() {
        return Err(CiteGraphError::no_data("cannot reshape an empty observation set"));
    }

    let dates: Vec<NaiveDate> = observations
        .iter()
        .map(|o| o.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns: HashMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    let mut rows: HashMap<&str, usize> = HashMap::new();
    let mut titles = Vec::new();
    let mut cells: Vec<Vec<Option<u64>>> = Vec::new();
    let mut duplicates_resolved = 0;

    for observation in observations {
        let row = *rows.entry(observation.title.as_str()).or_insert_with(|| {
            titles.push(observation.title.clone());
            cells.push(vec![None; dates.len()]);
            titles.len() - 1
        });
        let column = columns[&observation.date];

        if cells[row][column].replace(observation.citations).is_some() {
            duplicates_resolved += 1;
        }
    }

    if duplicates_resolved > 0 {
        debug!(
            "Resolved {} duplicate (title, date) observations with last-write-wins",
            duplicates_resolved
        );
    }
    debug!(
        "Reshaped into {} publications over {} dates",
        titles.len(),
        dates.len()
    );

    Ok(WideMatrix {
        titles,
        dates,
        cells,
        duplicates_resolved,
    })
}

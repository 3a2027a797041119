//! Cumulative totals and ranked subsets derived from the wide matrix

use crate::WideMatrix;
use chrono::NaiveDate;
use citegraph_common::{CiteGraphError, Result};
use std::cmp::Reverse;
use tracing::{debug, info, instrument};

/// Column sums over the date axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeSeries {
    dates: Vec<NaiveDate>,
    totals: Vec<u64>,
}

impl CumulativeSeries {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn totals(&self) -> &[u64] {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.dates.iter().copied().zip(self.totals.iter().copied())
    }
}

/// One publication selected by [`top_k`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub title: String,
    /// Cells exactly as they appear in the matrix, absences included
    pub cells: Vec<Option<u64>>,
    /// Value used for ranking: the last-date cell with absent read as zero
    pub rank_value: u64,
}

/// Highest-ranked publications at the last date, best first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSubset {
    dates: Vec<NaiveDate>,
    entries: Vec<RankedEntry>,
    requested: usize,
}

impl RankedSubset {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` the caller asked for
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Whether fewer publications existed than were requested
    pub fn was_clamped(&self) -> bool {
        self.entries.len() < self.requested
    }

    /// The subset as a matrix of its own, rows in rank order
    pub fn to_matrix(&self) -> WideMatrix {
        WideMatrix::from_parts(
            self.entries.iter().map(|e| e.title.clone()).collect(),
            self.dates.clone(),
            self.entries.iter().map(|e| e.cells.clone()).collect(),
        )
    }
}

/// Sum every column with absent cells read as zero
#[instrument(skip_all, fields(publications = matrix.publication_count()))]
pub fn cumulative(matrix: &WideMatrix) -> CumulativeSeries {
    let mut totals = vec![0u64; matrix.date_count()];
    for (_, row) in matrix.rows() {
        for (total, cell) in totals.iter_mut().zip(row) {
            *total += cell.unwrap_or(0);
        }
    }

    debug!("Computed cumulative series over {} dates", totals.len());
    CumulativeSeries {
        dates: matrix.dates().to_vec(),
        totals,
    }
}

/// Select the `k` publications with the most citations on the last date
///
/// Ties keep row order. `k` larger than the number of publications is clamped;
/// `k == 0` is an [`CiteGraphError::InvalidRank`].
#[instrument(skip(matrix), fields(publications = matrix.publication_count()))]
pub fn top_k(matrix: &WideMatrix, k: usize) -> Result<RankedSubset> {
    if k == 0 {
        return Err(CiteGraphError::invalid_rank("top-K needs k of at least 1", k));
    }

    let last = matrix.date_count().checked_sub(1);
    let mut entries: Vec<RankedEntry> = matrix
        .rows()
        .map(|(title, row)| RankedEntry {
            title: title.to_string(),
            cells: row.to_vec(),
            rank_value: last.and_then(|i| row[i]).unwrap_or(0),
        })
        .collect();

    // Stable sort keeps first-seen order among ties
    entries.sort_by_key(|e| Reverse(e.rank_value));

    if k > entries.len() {
        info!(
            "Requested top {} but only {} publications exist; clamping",
            k,
            entries.len()
        );
    }
    entries.truncate(k);

    Ok(RankedSubset {
        dates: matrix.dates().to_vec(),
        entries,
        requested: k,
    })
}

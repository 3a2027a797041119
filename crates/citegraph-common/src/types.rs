//! Observation types shared across the citegraph workspace

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for the `Date` column and chart axis labels
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One scraped citation count for one publication on one day
///
/// Field names follow the long-format log header: `Date,Title,Citations`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Citations")]
    pub citations: u64,
}

impl Observation {
    pub fn new(date: NaiveDate, title: impl Into<String>, citations: u64) -> Self {
        Self {
            date,
            title: title.into(),
            citations,
        }
    }
}

/// Observations in arrival order
///
/// No uniqueness is enforced here; consumers treat `(title, date)` as the key
/// and resolve repeats with last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSet {
    observations: Vec<Observation>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    pub fn into_inner(self) -> Vec<Observation> {
        self.observations
    }
}

impl From<Vec<Observation>> for ObservationSet {
    fn from(observations: Vec<Observation>) -> Self {
        Self { observations }
    }
}

impl FromIterator<Observation> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self {
            observations: iter.into_iter().collect(),
        }
    }
}

impl Extend<Observation> for ObservationSet {
    fn extend<I: IntoIterator<Item = Observation>>(&mut self, iter: I) {
        self.observations.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ObservationSet {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

impl IntoIterator for ObservationSet {
    type Item = Observation;
    type IntoIter = std::vec::IntoIter<Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.into_iter()
    }
}

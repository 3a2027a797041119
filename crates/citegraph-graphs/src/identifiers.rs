//! File-name identifiers for per-publication charts

use std::collections::{HashMap, HashSet};

const STEM_WORDS: usize = 5;

/// Short file stem from a title: first five words, alphanumerics only, joined by `_`
pub fn derive_stem(title: &str) -> String {
    let words: Vec<String> = title
        .split_whitespace()
        .take(STEM_WORDS)
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        "untitled".to_string()
    } else {
        words.join("_")
    }
}

/// Hands out one identifier per distinct title
///
/// Two titles with the same stem get `_2`, `_3`, ... appended in allocation
/// order. Comparison is case-insensitive so the identifiers stay distinct on
/// case-insensitive file systems.
#[derive(Debug, Default)]
pub struct IdentifierAllocator {
    assigned: HashMap<String, String>,
    taken: HashSet<String>,
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier for `title`; asking again for the same title returns the same value
    pub fn allocate(&mut self, title: &str) -> String {
        if let Some(existing) = self.assigned.get(title) {
            return existing.clone();
        }

        let stem = derive_stem(title);
        let mut candidate = stem.clone();
        let mut suffix = 2;
        while self.taken.contains(&candidate.to_lowercase()) {
            candidate = format!("{}_{}", stem, suffix);
            suffix += 1;
        }

        self.taken.insert(candidate.to_lowercase());
        self.assigned.insert(title.to_string(), candidate.clone());
        candidate
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Nombre",
    "Apellido",
    "Animal",
    "País o capital",
    "Comida",
    "Objeto",
    "Color",
    "Cantante o banda",
];

/// Ordered, duplicate-free list of category labels shared by every round.
///
/// Never empty. Uniqueness is case-sensitive, as typed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet {
    labels: Vec<String>,
}

impl CategorySet {
    /// Builds a set from arbitrary labels, trimming them and skipping blanks
    /// and repeats. Fails with `Underflow` if nothing usable remains.
    pub fn new<I, S>(labels: I) -> GameResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self { labels: Vec::new() };
        for label in labels {
            // Blanks and repeats are skipped here rather than rejected.
            let _ = set.add(label.as_ref());
        }
        if set.labels.is_empty() {
            return Err(GameError::Underflow);
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Appends a trimmed label and returns its index.
    pub fn add(&mut self, label: &str) -> GameResult<usize> {
        let label = label.trim();
        if label.is_empty() || self.contains(label) {
            return Err(GameError::InvalidCategory(label.to_string()));
        }
        self.labels.push(label.to_string());
        Ok(self.labels.len() - 1)
    }

    /// Removes and returns the label at `index`. The last label cannot be removed.
    pub fn remove(&mut self, index: usize) -> GameResult<String> {
        if index >= self.labels.len() {
            return Err(GameError::OutOfRange {
                index,
                len: self.labels.len(),
            });
        }
        if self.labels.len() == 1 {
            return Err(GameError::Underflow);
        }
        Ok(self.labels.remove(index))
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            labels: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

//! Measurement counts and execution results.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Frequencies of measured bitstrings.
///
/// A bitstring lists the highest classical bit first: character `i` of an
/// `n`-character string is bit `c[n-1-i]`. Read as a binary number it is
/// the integer value of the classical register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from `(bitstring, count)` pairs, summing duplicates.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, u64)>) -> Self {
        let mut counts = Self::new();
        for (bitstring, count) in pairs {
            counts.insert(bitstring, count);
        }
        counts
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Number of times `bitstring` was observed (0 if never).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of observations.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Observed frequency of `bitstring`, 0.0 for empty counts.
    #[allow(clippy::cast_precision_loss)]
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / total as f64
        }
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Outcomes by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The most frequent outcome, ties broken by the smaller bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.sorted().into_iter().next()
    }

    /// Distribution over a subset of classical bits.
    ///
    /// `clbits[0]` becomes the least significant (rightmost) bit of the
    /// resulting bitstrings. Bits beyond a bitstring's width read as 0.
    pub fn marginal(&self, clbits: &[usize]) -> Counts {
        let mut marginal = Counts::new();
        for (bitstring, count) in self.iter() {
            let bytes = bitstring.as_bytes();
            let key: String = clbits
                .iter()
                .rev()
                .map(|&bit| {
                    bytes
                        .len()
                        .checked_sub(bit + 1)
                        .and_then(|pos| bytes.get(pos))
                        .map_or('0', |&b| b as char)
                })
                .collect();
            marginal.insert(key, count);
        }
        marginal
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<_> = self
            .sorted()
            .into_iter()
            .map(|(bits, count)| format!("'{bits}': {count}"))
            .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

/// Outcome of one [`Backend::run`](crate::Backend::run) call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts.
    pub counts: Counts,
    /// Number of shots requested.
    pub shots: u32,
    /// Name of the backend that produced the counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// Wall-clock execution time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// Backend-specific metadata.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ExecutionResult {
    /// Create a result from counts.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            backend: None,
            execution_time_ms: None,
            metadata: serde_json::Map::new(),
        }
    }

    /// Record the producing backend.
    #[must_use]
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    /// Record the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Observed frequency of `bitstring`.
    pub fn probability(&self, bitstring: &str) -> f64 {
        self.counts.probability(bitstring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("00", 3);
        counts.insert("11", 5);
        counts.insert("00", 2);

        assert_eq!(counts.get("00"), 5);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 10);
        assert_eq!(counts.len(), 2);
        assert!((counts.probability("11") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_and_most_frequent() {
        let counts = Counts::from_pairs([("10", 4), ("01", 4), ("11", 9)]);
        assert_eq!(counts.sorted(), vec![("11", 9), ("01", 4), ("10", 4)]);
        assert_eq!(counts.most_frequent(), Some(("11", 9)));
        assert_eq!(Counts::new().most_frequent(), None);
    }

    #[test]
    fn test_marginal() {
        // c2 c1 c0
        let counts = Counts::from_pairs([("100", 3), ("101", 2), ("011", 5)]);

        let c2 = counts.marginal(&[2]);
        assert_eq!(c2.get("1"), 5);
        assert_eq!(c2.get("0"), 5);

        let low = counts.marginal(&[0, 1]);
        assert_eq!(low.get("00"), 3);
        assert_eq!(low.get("01"), 2);
        assert_eq!(low.get("11"), 5);
    }

    #[test]
    fn test_probability_of_empty() {
        assert_eq!(Counts::new().probability("0"), 0.0);
    }

    #[test]
    fn test_result_json() {
        let result = ExecutionResult::new(Counts::from_pairs([("1", 7)]), 7)
            .with_backend("simulator")
            .with_execution_time(3);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["counts"]["1"], 7);
        assert_eq!(json["backend"], "simulator");
        assert!(json.get("metadata").is_none());
        assert_eq!(result.counts.to_string(), "{'1': 7}");
    }
}

// src/results.rs
//! The result map and the fragment merge protocol.
//!
//! `rule -> file -> set of 1-based lines`. BTree containers keep every
//! level ascending and duplicate-free, which is the invariant the
//! snapshot format and the differ rely on.

use std::collections::{BTreeMap, BTreeSet};

pub type LineSet = BTreeSet<u32>;
pub type FileLines = BTreeMap<String, LineSet>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultMap {
    rules: BTreeMap<String, FileLines>,
}

impl ResultMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one finding line.
    pub fn record(&mut self, rule: &str, file: &str, line: u32) {
        self.rules
            .entry(rule.to_string())
            .or_default()
            .entry(file.to_string())
            .or_default()
            .insert(line);
    }

    /// Replaces the full line set for one (rule, file) key. Returns true
    /// if a prior entry existed for that exact key.
    pub fn insert_lines(&mut self, rule: &str, file: &str, lines: LineSet) -> bool {
        self.rules
            .entry(rule.to_string())
            .or_default()
            .insert(file.to_string(), lines)
            .is_some()
    }

    /// Ensures a rule key exists, with an empty file map if absent. Used
    /// to give every resolved rule a baseline entry even when it reported
    /// nothing this run.
    pub fn ensure_rule(&mut self, rule: &str) {
        self.rules.entry(rule.to_string()).or_default();
    }

    #[must_use]
    pub fn rule_names(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    #[must_use]
    pub fn files(&self, rule: &str) -> Option<&FileLines> {
        self.rules.get(rule)
    }

    #[must_use]
    pub fn lines(&self, rule: &str, file: &str) -> Option<&LineSet> {
        self.rules.get(rule)?.get(file)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileLines)> {
        self.rules.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The partial result map produced by analyzing one target. Produced and
/// owned by exactly one executor invocation, handed off once.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub target: String,
    map: ResultMap,
}

impl Fragment {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            map: ResultMap::new(),
        }
    }

    /// Stores the line set for one (rule, file) pair touched by this
    /// target.
    pub fn insert_lines(&mut self, rule: &str, file: &str, lines: LineSet) {
        self.map.insert_lines(rule, file, lines);
    }

    #[must_use]
    pub fn as_map(&self) -> &ResultMap {
        &self.map
    }
}

#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub map: ResultMap,
    /// (rule, file) keys that appeared in more than one fragment. Files
    /// belong to exactly one target, so any entry here points at a corpus
    /// layout mistake.
    pub collisions: Vec<(String, String)>,
}

/// Merges fragments into one unified map. Shallow override union: a later
/// fragment's line set fully replaces a prior value for the same
/// (rule, file) key. Order-independent as long as no key collides.
#[must_use]
pub fn merge(fragments: Vec<Fragment>) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    for fragment in fragments {
        for (rule, files) in fragment.map.rules {
            for (file, lines) in files {
                if outcome.map.insert_lines(&rule, &file, lines) {
                    outcome.collisions.push((rule.clone(), file));
                }
            }
        }
    }
    outcome
}

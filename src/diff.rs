// src/diff.rs
//! The differ / verdict engine.
//!
//! Compares the aggregated result map against the loaded baseline. For
//! every rule and every file in the union of both sides' file sets:
//! `missing = expected - actual` (a regression), `extra = actual -
//! expected` (newly introduced or newly detected). Mismatches are data,
//! not errors; the only failure signal is the process exit code.

use crate::results::{LineSet, ResultMap};
use serde::Serialize;
use std::collections::BTreeSet;

/// One rule/file pair whose line sets drifted from the baseline.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiffEntry {
    pub rule: String,
    pub file: String,
    /// In the baseline, absent from this run.
    pub missing: Vec<u32>,
    /// In this run, absent from the baseline.
    pub extra: Vec<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Verdict {
    pub entries: Vec<DiffEntry>,
}

impl Verdict {
    /// Pass iff no rule/file pair has a non-empty missing or extra set.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Diffs actual against expected over the union of rule keys and, per
/// rule, the union of file keys. The union matters on both levels: a rule
/// that stops reporting on a previously flagged file must show those
/// lines as missing, and a rule that starts reporting on a brand-new file
/// must show those lines as extra.
#[must_use]
pub fn diff(actual: &ResultMap, expected: &ResultMap) -> Verdict {
    let mut entries = Vec::new();

    let rule_names: BTreeSet<String> = expected
        .rule_names()
        .into_iter()
        .chain(actual.rule_names())
        .collect();

    for rule in &rule_names {
        let empty = crate::results::FileLines::new();
        let actual_files = actual.files(rule).unwrap_or(&empty);
        let expected_files = expected.files(rule).unwrap_or(&empty);

        let file_names: BTreeSet<&String> =
            actual_files.keys().chain(expected_files.keys()).collect();

        for file in file_names {
            let empty_lines = LineSet::new();
            let actual_lines = actual_files.get(file).unwrap_or(&empty_lines);
            let expected_lines = expected_files.get(file).unwrap_or(&empty_lines);

            let missing: Vec<u32> = expected_lines.difference(actual_lines).copied().collect();
            let extra: Vec<u32> = actual_lines.difference(expected_lines).copied().collect();

            if !missing.is_empty() || !extra.is_empty() {
                entries.push(DiffEntry {
                    rule: rule.clone(),
                    file: file.clone(),
                    missing,
                    extra,
                });
            }
        }
    }

    Verdict { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str, &[u32])]) -> ResultMap {
        let mut m = ResultMap::new();
        for (rule, file, lines) in entries {
            m.insert_lines(rule, file, lines.iter().copied().collect());
        }
        m
    }

    // Baseline has [3,10]; the run only found [3]. Line 10 regressed.
    #[test]
    fn missing_line_fails_the_verdict() {
        let expected = map(&[("R", "f.ts", &[3, 10])]);
        let actual = map(&[("R", "f.ts", &[3])]);

        let verdict = diff(&actual, &expected);
        assert!(!verdict.passed());
        assert_eq!(
            verdict.entries,
            [DiffEntry {
                rule: "R".to_string(),
                file: "f.ts".to_string(),
                missing: vec![10],
                extra: vec![],
            }]
        );
    }

    // Empty baseline; the run found [5] in a file the baseline never saw.
    #[test]
    fn extra_line_in_a_new_file_fails_the_verdict() {
        let mut expected = ResultMap::new();
        expected.ensure_rule("R");
        let actual = map(&[("R", "g.ts", &[5])]);

        let verdict = diff(&actual, &expected);
        assert!(!verdict.passed());
        assert_eq!(
            verdict.entries,
            [DiffEntry {
                rule: "R".to_string(),
                file: "g.ts".to_string(),
                missing: vec![],
                extra: vec![5],
            }]
        );
    }

    #[test]
    fn identical_maps_pass() {
        let expected = map(&[("R", "f.ts", &[3, 10]), ("S", "g.ts", &[1])]);
        let actual = expected.clone();
        assert!(diff(&actual, &expected).passed());
    }

    // A file present only in the baseline must surface all its lines as
    // missing; a file present only in the run must surface all as extra.
    #[test]
    fn file_union_covers_both_sides() {
        let expected = map(&[("R", "gone.ts", &[1, 2])]);
        let actual = map(&[("R", "new.ts", &[7])]);

        let verdict = diff(&actual, &expected);
        assert_eq!(verdict.entries.len(), 2);

        let gone = verdict.entries.iter().find(|e| e.file == "gone.ts").unwrap();
        assert_eq!(gone.missing, [1, 2]);
        assert!(gone.extra.is_empty());

        let fresh = verdict.entries.iter().find(|e| e.file == "new.ts").unwrap();
        assert!(fresh.missing.is_empty());
        assert_eq!(fresh.extra, [7]);
    }

    // missing ∩ actual = ∅, extra ∩ expected = ∅, and
    // actual = (expected - missing) ∪ extra.
    #[test]
    fn set_algebra_holds() {
        let expected = map(&[("R", "f.rs", &[1, 2, 3, 8])]);
        let actual = map(&[("R", "f.rs", &[2, 3, 9, 11])]);

        let verdict = diff(&actual, &expected);
        let entry = &verdict.entries[0];

        let actual_lines = actual.lines("R", "f.rs").unwrap();
        let expected_lines = expected.lines("R", "f.rs").unwrap();

        assert!(entry.missing.iter().all(|l| !actual_lines.contains(l)));
        assert!(entry.extra.iter().all(|l| !expected_lines.contains(l)));

        let missing: LineSet = entry.missing.iter().copied().collect();
        let extra: LineSet = entry.extra.iter().copied().collect();
        let rebuilt: LineSet = expected_lines
            .difference(&missing)
            .copied()
            .chain(extra.iter().copied())
            .collect();
        assert_eq!(&rebuilt, actual_lines);
    }
}

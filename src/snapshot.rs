// src/snapshot.rs
//! The persisted baseline: one flat file per rule.
//!
//! Line format: `relative/file.rs: 3,10,42` (ascending, comma-joined,
//! newline-terminated). Baselines are advisory ground truth: absent files
//! load as empty, malformed lines are skipped with a warning.

use crate::results::{LineSet, ResultMap};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loads the expected result map for the given rules. A rule with no
    /// snapshot file on disk gets an empty entry, not an error (a
    /// brand-new rule has no baseline yet).
    #[must_use]
    pub fn load(&self, rule_names: &[String]) -> ResultMap {
        let mut expected = ResultMap::new();
        for rule in rule_names {
            expected.ensure_rule(rule);
            let path = self.dir.join(rule);
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            for raw in content.lines() {
                if raw.trim().is_empty() {
                    continue;
                }
                match parse_line(raw) {
                    Some((file, lines)) => {
                        expected.insert_lines(rule, &file, lines);
                    }
                    None => {
                        eprintln!(
                            "WARN: skipping malformed baseline line in {}: {raw}",
                            path.display()
                        );
                    }
                }
            }
        }
        expected
    }

    /// Writes one snapshot file per rule present in the map. Rules absent
    /// from the map keep their existing files, so a single-rule update
    /// cannot wipe sibling baselines.
    ///
    /// # Errors
    /// Returns error if the snapshot directory or a file cannot be
    /// written.
    pub fn save(&self, results: &ResultMap) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        for (rule, files) in results.iter() {
            let mut content = String::new();
            for (file, lines) in files {
                let joined: Vec<String> = lines.iter().map(ToString::to_string).collect();
                content.push_str(&format!("{file}: {}\n", joined.join(",")));
            }
            atomic_write(&self.dir.join(rule), &content)?;
        }
        Ok(())
    }
}

/// Parses one `file: n1,n2,n3` baseline line. Returns None if the line
/// has no separator or a non-numeric entry.
fn parse_line(raw: &str) -> Option<(String, LineSet)> {
    let (file, rest) = raw.split_once(':')?;
    let file = file.trim();
    if file.is_empty() {
        return None;
    }

    let mut lines = LineSet::new();
    for token in rest.split(',') {
        lines.insert(token.trim().parse::<u32>().ok()?);
    }
    Some((file.to_string(), lines))
}

fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lines(v: &[u32]) -> LineSet {
        v.iter().copied().collect()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let mut results = ResultMap::new();
        results.insert_lines("rule-a", "x/f.rs", lines(&[3, 10]));
        results.insert_lines("rule-a", "y/g.rs", lines(&[5]));
        store.save(&results).unwrap();

        let on_disk = fs::read_to_string(dir.path().join("rule-a")).unwrap();
        assert_eq!(on_disk, "x/f.rs: 3,10\ny/g.rs: 5\n");

        let loaded = store.load(&["rule-a".to_string()]);
        assert_eq!(loaded, results);
    }

    #[test]
    fn absent_rule_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let loaded = store.load(&["brand-new-rule".to_string()]);
        assert!(loaded.files("brand-new-rule").unwrap().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("rule-a"),
            "good.rs: 1,2\nno separator line\nbad.rs: 3,oops\n",
        )
        .unwrap();

        let store = SnapshotStore::new(dir.path());
        let loaded = store.load(&["rule-a".to_string()]);

        assert!(loaded.lines("rule-a", "good.rs").is_some());
        assert!(loaded.lines("rule-a", "bad.rs").is_none());
        assert_eq!(loaded.files("rule-a").unwrap().len(), 1);
    }

    #[test]
    fn saving_one_rule_preserves_sibling_baselines() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let mut both = ResultMap::new();
        both.insert_lines("rule-a", "f.rs", lines(&[1]));
        both.insert_lines("rule-b", "g.rs", lines(&[2]));
        store.save(&both).unwrap();

        let mut only_a = ResultMap::new();
        only_a.insert_lines("rule-a", "f.rs", lines(&[9]));
        store.save(&only_a).unwrap();

        let loaded = store.load(&["rule-a".to_string(), "rule-b".to_string()]);
        assert_eq!(loaded.lines("rule-a", "f.rs"), Some(&lines(&[9])));
        assert_eq!(loaded.lines("rule-b", "g.rs"), Some(&lines(&[2])));
    }

    #[test]
    fn rule_with_no_findings_writes_an_empty_file() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let mut results = ResultMap::new();
        results.ensure_rule("quiet-rule");
        store.save(&results).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("quiet-rule")).unwrap(),
            ""
        );
        let loaded = store.load(&["quiet-rule".to_string()]);
        assert!(loaded.files("quiet-rule").unwrap().is_empty());
    }
}

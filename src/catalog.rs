// src/catalog.rs
//! Target discovery under the corpus root.
//!
//! A target is one independently analyzable project, identified by its
//! descriptor file. The catalog only finds and orders descriptors; it
//! never interprets them (that is the engine's job).

use crate::config::Config;
use crate::error::{HarnessError, Result};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name that marks a project as an analysis target.
pub const DESCRIPTOR_NAME: &str = "target.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Path to the descriptor file. Opaque to everything but the engine.
    pub descriptor: PathBuf,
    /// Descriptor's parent directory relative to the corpus root,
    /// forward-slash normalized. Used for display and priority matching.
    pub name: String,
    /// Scheduling weight. Heavier targets are claimed first so long jobs
    /// start while short jobs fill in the tail.
    pub weight: i64,
}

/// Discovers all targets under `root` in deterministic run order.
///
/// Ordering: weight descending, then name lexicographic. An empty corpus
/// is a successful empty run, not an error.
///
/// # Errors
/// Returns `CorpusRootMissing` if `root` does not exist.
pub fn discover(root: &Path, config: &Config) -> Result<Vec<Target>> {
    if !root.exists() {
        return Err(HarnessError::CorpusRootMissing(root.to_path_buf()));
    }

    let mut targets = Vec::new();
    let mut walk_errors = 0usize;

    for item in WalkDir::new(root).follow_links(false) {
        let entry = match item {
            Ok(entry) => entry,
            Err(_) => {
                walk_errors += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != DESCRIPTOR_NAME {
            continue;
        }

        let name = target_name(entry.path(), root);
        if is_excluded(&name, config) {
            continue;
        }

        targets.push(Target {
            descriptor: entry.path().to_path_buf(),
            name: name.clone(),
            weight: config.weight_for(&name),
        });
    }

    if walk_errors > 0 && config.verbose {
        eprintln!("WARN: Encountered {walk_errors} errors during corpus walk");
    }

    targets.sort_by(compare_targets);
    Ok(targets)
}

/// Priority comparator: heavier first, then lexicographic by name.
fn compare_targets(a: &Target, b: &Target) -> Ordering {
    b.weight.cmp(&a.weight).then_with(|| a.name.cmp(&b.name))
}

fn is_excluded(name: &str, config: &Config) -> bool {
    config.exclude_patterns.iter().any(|re| re.is_match(name))
}

/// Descriptor's parent directory relative to the corpus root.
fn target_name(descriptor: &Path, root: &Path) -> String {
    let parent = descriptor.parent().unwrap_or(Path::new(""));
    relative_name(parent, root)
}

/// Normalizes a path to a corpus-root-relative, forward-slash key so
/// baselines are host-independent.
#[must_use]
pub fn relative_name(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() {
        ".".to_string()
    } else {
        s
    }
}

// src/engine.rs
//! Source-analysis engine boundary.
//!
//! The harness treats program construction as an opaque service: given a
//! target descriptor, produce a checked program. `TomlEngine` is the
//! reference implementation; a type-resolving engine plugs in behind the
//! same trait.

use crate::catalog::{relative_name, Target};
use crate::error::{HarnessError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Target descriptor: one closed, independently analyzable module set.
#[derive(Debug, Deserialize)]
struct Descriptor {
    /// Base directory for `files`, relative to the descriptor.
    #[serde(default = "default_root")]
    root: String,
    /// The module set.
    files: Vec<String>,
    /// Substring filters for generated files that must not be analyzed.
    #[serde(default)]
    exclude: Vec<String>,
}

fn default_root() -> String {
    ".".to_string()
}

/// One analyzable source file of a checked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Corpus-root-relative name. This is the key baselines are stored
    /// under, so it must be host-independent.
    pub rel_name: String,
    pub text: String,
}

/// A fully loaded program for one target. Dropped when the executor
/// returns; nothing is cached across invocations.
#[derive(Debug)]
pub struct Program {
    pub target: String,
    pub files: Vec<SourceFile>,
}

pub trait SourceEngine: Send + Sync {
    /// Builds one checked program for a target.
    ///
    /// # Errors
    /// A descriptor that fails to parse, or lists unreadable files, is a
    /// fragment-level failure for that target only.
    fn check(&self, target: &Target) -> Result<Program>;
}

/// Reference engine: interprets TOML descriptors and loads the enumerated
/// module set into memory.
pub struct TomlEngine {
    corpus_root: PathBuf,
}

impl TomlEngine {
    #[must_use]
    pub fn new(corpus_root: impl Into<PathBuf>) -> Self {
        Self {
            corpus_root: corpus_root.into(),
        }
    }
}

impl SourceEngine for TomlEngine {
    fn check(&self, target: &Target) -> Result<Program> {
        let text = fs::read_to_string(&target.descriptor)
            .map_err(|e| HarnessError::io(e, &target.descriptor))?;

        let descriptor: Descriptor =
            toml::from_str(&text).map_err(|e| HarnessError::MalformedTarget {
                path: target.descriptor.clone(),
                reason: e.to_string(),
            })?;

        let base = target
            .descriptor
            .parent()
            .unwrap_or(Path::new("."))
            .join(&descriptor.root);

        let mut files = Vec::with_capacity(descriptor.files.len());
        for name in &descriptor.files {
            if is_declaration(name) || is_generated(name, &descriptor.exclude) {
                continue;
            }

            // Normalize away `.` segments so baseline keys stay clean
            // when a descriptor uses the default root.
            let path: PathBuf = base.join(name).components().collect();
            let text = fs::read_to_string(&path).map_err(|e| HarnessError::MalformedTarget {
                path: target.descriptor.clone(),
                reason: format!("cannot read listed file {name}: {e}"),
            })?;

            files.push(SourceFile {
                rel_name: relative_name(&path, &self.corpus_root),
                text,
            });
        }

        // Deterministic file order regardless of descriptor order.
        files.sort_by(|a, b| a.rel_name.cmp(&b.rel_name));
        files.dedup_by(|a, b| a.rel_name == b.rel_name);

        Ok(Program {
            target: target.name.clone(),
            files,
        })
    }
}

/// Declaration files carry no analyzable statements.
fn is_declaration(name: &str) -> bool {
    name.ends_with(".d.ts")
}

fn is_generated(name: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|pat| name.contains(pat.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn target_at(descriptor: PathBuf, name: &str) -> Target {
        Target {
            descriptor,
            name: name.to_string(),
            weight: 0,
        }
    }

    #[test]
    fn loads_the_module_set_sorted() {
        let dir = TempDir::new().unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir_all(proj.join("src")).unwrap();
        fs::write(proj.join("src/b.rs"), "fn b() {}\n").unwrap();
        fs::write(proj.join("src/a.rs"), "fn a() {}\n").unwrap();
        fs::write(
            proj.join("target.toml"),
            "root = \"src\"\nfiles = [\"b.rs\", \"a.rs\"]\n",
        )
        .unwrap();

        let engine = TomlEngine::new(dir.path());
        let program = engine
            .check(&target_at(proj.join("target.toml"), "proj"))
            .unwrap();

        let names: Vec<&str> = program.files.iter().map(|f| f.rel_name.as_str()).collect();
        assert_eq!(names, ["proj/src/a.rs", "proj/src/b.rs"]);
        assert_eq!(program.target, "proj");
    }

    #[test]
    fn malformed_descriptor_is_a_fragment_failure() {
        let dir = TempDir::new().unwrap();
        let proj = dir.path().join("broken");
        fs::create_dir_all(&proj).unwrap();
        fs::write(proj.join("target.toml"), "files = not-a-list").unwrap();

        let engine = TomlEngine::new(dir.path());
        let err = engine
            .check(&target_at(proj.join("target.toml"), "broken"))
            .unwrap_err();
        assert!(matches!(err, HarnessError::MalformedTarget { .. }));
    }

    #[test]
    fn unreadable_listed_file_is_a_fragment_failure() {
        let dir = TempDir::new().unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir_all(&proj).unwrap();
        fs::write(proj.join("target.toml"), "files = [\"missing.rs\"]\n").unwrap();

        let engine = TomlEngine::new(dir.path());
        let err = engine
            .check(&target_at(proj.join("target.toml"), "proj"))
            .unwrap_err();
        assert!(matches!(err, HarnessError::MalformedTarget { .. }));
    }

    #[test]
    fn skips_declaration_and_generated_files() {
        let dir = TempDir::new().unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir_all(&proj).unwrap();
        fs::write(proj.join("real.rs"), "fn real() {}\n").unwrap();
        fs::write(
            proj.join("target.toml"),
            "files = [\"real.rs\", \"types.d.ts\", \"schema_gen.rs\"]\nexclude = [\"_gen\"]\n",
        )
        .unwrap();

        let engine = TomlEngine::new(dir.path());
        let program = engine
            .check(&target_at(proj.join("target.toml"), "proj"))
            .unwrap();
        let names: Vec<&str> = program.files.iter().map(|f| f.rel_name.as_str()).collect();
        assert_eq!(names, ["proj/real.rs"]);
    }
}

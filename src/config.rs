// src/config.rs
//! Harness configuration: `rulegate.toml` plus CLI overrides.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_PATH: &str = "rulegate.toml";

/// On-disk shape of `rulegate.toml`. Every field is optional; a missing
/// file means all defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RulegateToml {
    #[serde(default)]
    pub harness: HarnessSection,
    #[serde(default)]
    pub priority: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessSection {
    #[serde(default = "default_corpus")]
    pub corpus: PathBuf,
    #[serde(default = "default_snapshots")]
    pub snapshots: PathBuf,
    /// 0 means "use the host's available parallelism".
    #[serde(default)]
    pub jobs: usize,
    /// Per-unit timeout in seconds; 0 disables the timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Regex filters applied to corpus-relative target names during
    /// discovery.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for HarnessSection {
    fn default() -> Self {
        Self {
            corpus: default_corpus(),
            snapshots: default_snapshots(),
            jobs: 0,
            timeout_secs: default_timeout(),
            exclude: Vec::new(),
        }
    }
}

fn default_corpus() -> PathBuf {
    PathBuf::from("corpus")
}
fn default_snapshots() -> PathBuf {
    PathBuf::from("snapshots")
}
const fn default_timeout() -> u64 {
    600
}

/// Runtime configuration with compiled patterns.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub corpus: PathBuf,
    pub snapshots: PathBuf,
    pub jobs: usize,
    pub timeout_secs: u64,
    pub exclude_patterns: Vec<Regex>,
    pub priority: BTreeMap<String, i64>,
    pub verbose: bool,
}

impl Config {
    /// Loads `rulegate.toml` from the working directory if present,
    /// otherwise returns defaults.
    ///
    /// # Errors
    /// Returns error if the file exists but is invalid TOML, or an exclude
    /// pattern fails to compile.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_PATH))
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// Returns error on invalid TOML or an invalid exclude regex.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Self::from_toml(RulegateToml::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let raw: RulegateToml = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in {}", path.display()))?;
        Self::from_toml(raw)
    }

    /// Builds a runtime config from the serde shape, compiling patterns.
    ///
    /// # Errors
    /// Returns error if an exclude pattern is not a valid regex.
    pub fn from_toml(raw: RulegateToml) -> Result<Self> {
        let mut exclude_patterns = Vec::with_capacity(raw.harness.exclude.len());
        for pat in &raw.harness.exclude {
            let re = Regex::new(pat).with_context(|| format!("Invalid exclude pattern: {pat}"))?;
            exclude_patterns.push(re);
        }

        Ok(Self {
            corpus: raw.harness.corpus,
            snapshots: raw.harness.snapshots,
            jobs: raw.harness.jobs,
            timeout_secs: raw.harness.timeout_secs,
            exclude_patterns,
            priority: raw.priority,
            verbose: false,
        })
    }

    /// Resolved pool size: the configured override, or the host's
    /// available parallelism.
    #[must_use]
    pub fn effective_jobs(&self) -> usize {
        if self.jobs > 0 {
            return self.jobs;
        }
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(4)
    }

    /// Per-unit timeout, if enabled.
    #[must_use]
    pub fn unit_timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Scheduling weight for a target name. Heavier targets run first.
    /// Weights match on name substrings so one entry can cover a subtree.
    #[must_use]
    pub fn weight_for(&self, name: &str) -> i64 {
        self.priority
            .iter()
            .filter(|(key, _)| name.contains(key.as_str()))
            .map(|(_, w)| *w)
            .max()
            .unwrap_or(0)
    }
}

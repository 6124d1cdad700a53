// src/executor.rs
//! Target analysis: one target + the rule set -> one result fragment.

use crate::catalog::Target;
use crate::engine::SourceEngine;
use crate::error::Result;
use crate::results::{Fragment, LineSet};
use crate::rules::Rule;
use rayon::prelude::*;
use std::sync::Arc;

/// Analyzes one target. The checked program is built exactly once and
/// reused across every rule; building it is the dominant cost. All worked
/// objects are dropped when this returns; the next run rebuilds from
/// scratch.
///
/// # Errors
/// Program construction failure is fatal for this target only; the
/// scheduler records it as a fragment-level failure.
pub fn analyze(
    engine: &dyn SourceEngine,
    target: &Target,
    rules: &[Arc<dyn Rule>],
) -> Result<Fragment> {
    let program = engine.check(target)?;
    let program_ref = &program;

    // Per-file fan-out. Collection order does not matter: the fragment is
    // keyed by (rule, file) and line sets are ordered by construction.
    let touched: Vec<(String, String, LineSet)> = program
        .files
        .par_iter()
        .flat_map_iter(|file| {
            rules.iter().filter_map(move |rule| {
                let lines: LineSet = rule
                    .check(file, program_ref)
                    .iter()
                    .map(|finding| finding.line)
                    .collect();
                (!lines.is_empty())
                    .then(|| (rule.name().to_string(), file.rel_name.clone(), lines))
            })
        })
        .collect();

    let mut fragment = Fragment::new(&target.name);
    for (rule, file, lines) in touched {
        fragment.insert_lines(&rule, &file, lines);
    }
    Ok(fragment)
}

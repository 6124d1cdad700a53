// src/rules/no_long_line.rs
use super::{Finding, Rule};
use crate::engine::{Program, SourceFile};

/// Flags lines longer than the readability limit.
#[derive(Debug)]
pub struct NoLongLine;

const MAX_LEN: usize = 120;

impl Rule for NoLongLine {
    fn name(&self) -> &'static str {
        "no-long-line"
    }

    fn check(&self, file: &SourceFile, _program: &Program) -> Vec<Finding> {
        file.text
            .lines()
            .enumerate()
            .filter(|(_, line)| line.chars().count() > MAX_LEN)
            .map(|(idx, line)| {
                #[allow(clippy::cast_possible_truncation)]
                Finding::new(
                    idx as u32 + 1,
                    format!(
                        "Line has {} characters (limit: {MAX_LEN})",
                        line.chars().count()
                    ),
                )
            })
            .collect()
    }
}

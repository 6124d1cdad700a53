// src/rules/mod.rs
//! The rule capability and the built-in rule set.
//!
//! A rule is a named, stateless analyzer over one file of a checked
//! program. The built-ins here are line-oriented; richer rules (type
//! queries, cross-file analysis) implement the same trait and get the
//! whole `Program` to work with.

mod no_long_line;
mod no_todo_comment;
mod no_trailing_whitespace;

pub use no_long_line::NoLongLine;
pub use no_todo_comment::NoTodoComment;
pub use no_trailing_whitespace::NoTrailingWhitespace;

use crate::engine::{Program, SourceFile};
use std::sync::Arc;

/// One diagnostic raised by a rule against one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// 1-based reporting line of the diagnostic.
    pub line: u32,
    pub message: String,
}

impl Finding {
    #[must_use]
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

pub trait Rule: Send + Sync + std::fmt::Debug {
    /// Stable identifier; doubles as the snapshot file name.
    fn name(&self) -> &'static str;

    /// Analyzes one file of a checked program.
    fn check(&self, file: &SourceFile, program: &Program) -> Vec<Finding>;
}

/// Every rule shipped with the harness.
#[must_use]
pub fn builtin() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(NoTodoComment),
        Arc::new(NoLongLine),
        Arc::new(NoTrailingWhitespace),
    ]
}

#[cfg(test)]
pub(crate) fn test_file(rel_name: &str, text: &str) -> SourceFile {
    SourceFile {
        rel_name: rel_name.to_string(),
        text: text.to_string(),
    }
}

#[cfg(test)]
pub(crate) fn test_program(files: Vec<SourceFile>) -> Program {
    Program {
        target: "test".to_string(),
        files,
    }
}

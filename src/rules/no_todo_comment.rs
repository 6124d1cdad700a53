// src/rules/no_todo_comment.rs
use super::{Finding, Rule};
use crate::engine::{Program, SourceFile};

/// Flags TODO and FIXME markers left in source.
#[derive(Debug)]
pub struct NoTodoComment;

const MARKERS: [&str; 2] = ["TODO", "FIXME"];

impl Rule for NoTodoComment {
    fn name(&self) -> &'static str {
        "no-todo-comment"
    }

    fn check(&self, file: &SourceFile, _program: &Program) -> Vec<Finding> {
        file.text
            .lines()
            .enumerate()
            .filter(|(_, line)| MARKERS.iter().any(|m| line.contains(m)))
            .map(|(idx, _)| {
                #[allow(clippy::cast_possible_truncation)]
                Finding::new(idx as u32 + 1, "Complete the task associated to this comment")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{test_file, test_program};
    use super::*;

    #[test]
    fn flags_marker_lines() {
        let file = test_file("a.rs", "fn f() {}\n// TODO tidy this\nlet x = 1; // FIXME\n");
        let program = test_program(vec![file.clone()]);

        let findings = NoTodoComment.check(&file, &program);
        let lines: Vec<u32> = findings.iter().map(|f| f.line).collect();
        assert_eq!(lines, [2, 3]);
    }

    #[test]
    fn clean_file_has_no_findings() {
        let file = test_file("a.rs", "fn f() {}\n");
        let program = test_program(vec![file.clone()]);
        assert!(NoTodoComment.check(&file, &program).is_empty());
    }
}

// src/rules/no_trailing_whitespace.rs
use super::{Finding, Rule};
use crate::engine::{Program, SourceFile};

/// Flags lines that end in spaces or tabs.
#[derive(Debug)]
pub struct NoTrailingWhitespace;

impl Rule for NoTrailingWhitespace {
    fn name(&self) -> &'static str {
        "no-trailing-whitespace"
    }

    fn check(&self, file: &SourceFile, _program: &Program) -> Vec<Finding> {
        file.text
            .lines()
            .enumerate()
            .filter(|(_, line)| line.ends_with(' ') || line.ends_with('\t'))
            .map(|(idx, _)| {
                #[allow(clippy::cast_possible_truncation)]
                Finding::new(idx as u32 + 1, "Remove the trailing whitespace")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{test_file, test_program};
    use super::*;

    #[test]
    fn flags_space_and_tab_endings() {
        let file = test_file("a.rs", "clean\ntrailing \ntabbed\t\n");
        let program = test_program(vec![file.clone()]);

        let findings = NoTrailingWhitespace.check(&file, &program);
        let lines: Vec<u32> = findings.iter().map(|f| f.line).collect();
        assert_eq!(lines, [2, 3]);
    }
}

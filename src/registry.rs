// src/registry.rs
//! Rule resolution: the whole battery name-sorted, or exactly one rule.

use crate::error::{HarnessError, Result};
use crate::rules::{self, Rule};
use std::sync::Arc;

pub struct Registry {
    rules: Vec<Arc<dyn Rule>>,
}

impl Registry {
    /// Builds a registry; rules are kept name-sorted so console output is
    /// stable run to run.
    #[must_use]
    pub fn new(mut rules: Vec<Arc<dyn Rule>>) -> Self {
        rules.sort_by_key(|r| r.name());
        Self { rules }
    }

    /// Registry of every rule shipped with the harness.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(rules::builtin())
    }

    /// Resolves an optional name filter to the ordered rule list.
    ///
    /// # Errors
    /// Returns `RuleNotFound` for an unregistered name.
    pub fn resolve(&self, name: Option<&str>) -> Result<Vec<Arc<dyn Rule>>> {
        match name {
            None => Ok(self.rules.clone()),
            Some(wanted) => {
                let rule = self
                    .rules
                    .iter()
                    .find(|r| r.name() == wanted)
                    .ok_or_else(|| HarnessError::RuleNotFound(wanted.to_string()))?;
                Ok(vec![Arc::clone(rule)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_all_rules_name_sorted() {
        let rules = Registry::builtin().resolve(None).unwrap();
        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"no-todo-comment"));
    }

    #[test]
    fn resolves_a_single_named_rule() {
        let rules = Registry::builtin().resolve(Some("no-long-line")).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name(), "no-long-line");
    }

    #[test]
    fn unknown_rule_is_fatal() {
        let err = Registry::builtin().resolve(Some("no-such-rule")).unwrap_err();
        assert!(matches!(err, HarnessError::RuleNotFound(_)));
    }
}

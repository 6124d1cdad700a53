// src/report.rs
//! Console and JSON reporting.

use crate::catalog::Target;
use crate::diff::Verdict;
use crate::rules::Rule;
use crate::scheduler::UnitFailure;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub fn print_rules(rules: &[Arc<dyn Rule>]) {
    println!("Rules:");
    for rule in rules {
        println!("  * {}", rule.name());
    }
    println!();
}

pub fn print_plan(targets: &[Target], jobs: usize) {
    if targets.is_empty() {
        println!("No targets found; nothing to analyze.");
        return;
    }
    println!("Analyzing {} targets ({jobs} workers):", targets.len());
    for target in targets {
        println!("  * {}", target.name);
    }
    println!();
}

pub fn print_failures(failures: &[UnitFailure]) {
    for failure in failures {
        eprintln!(
            "{} target {} produced no fragment: {}",
            "failed:".red().bold(),
            failure.target,
            failure.reason
        );
    }
}

/// Missing/extra reports grouped by rule then file, each with the sorted
/// offending lines, so a human can locate and fix the rule or the
/// baseline directly.
pub fn print_verdict(verdict: &Verdict) {
    for entry in &verdict.entries {
        if !entry.missing.is_empty() {
            println!("{}", "Missing issues:".red().bold());
            println!("  * Rule: {}", entry.rule);
            println!("  * File: {}", entry.file);
            println!("  * Lines: {}", join_lines(&entry.missing));
            println!();
        }
        if !entry.extra.is_empty() {
            println!("{}", "Extra issues:".yellow().bold());
            println!("  * Rule: {}", entry.rule);
            println!("  * File: {}", entry.file);
            println!("  * Lines: {}", join_lines(&entry.extra));
            println!();
        }
    }
}

pub fn print_summary(verdict: &Verdict, failures: &[UnitFailure], elapsed: Duration) {
    if verdict.passed() && failures.is_empty() {
        println!(
            "{} Findings match the baseline ({elapsed:?}).",
            "OK".green().bold()
        );
        return;
    }

    let mut parts: Vec<String> = Vec::new();
    if !verdict.passed() {
        parts.push(format!("{} drifted rule/file pairs", verdict.entries.len()));
    }
    if !failures.is_empty() {
        parts.push(format!("{} failed targets", failures.len()));
    }
    println!(
        "{} Ruling found {} ({elapsed:?}).",
        "X".red().bold(),
        parts.join(", ")
    );
}

pub fn print_update_summary(rule_count: usize, failures: &[UnitFailure]) {
    if failures.is_empty() {
        println!(
            "{} Baselines updated for {rule_count} rules.",
            "OK".green().bold()
        );
    } else {
        println!(
            "{} Baselines updated for {rule_count} rules, but {} targets failed; \
             their files are not represented.",
            "~".yellow().bold(),
            failures.len()
        );
    }
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    target: &'a str,
    reason: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    verdict: &'a Verdict,
    failures: Vec<JsonFailure<'a>>,
}

/// Structured verdict for calling automation.
///
/// # Errors
/// Returns error if serialization fails.
pub fn json_report(verdict: &Verdict, failures: &[UnitFailure]) -> Result<String> {
    let report = JsonReport {
        passed: verdict.passed() && failures.is_empty(),
        verdict,
        failures: failures
            .iter()
            .map(|f| JsonFailure {
                target: &f.target,
                reason: &f.reason,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn join_lines(lines: &[u32]) -> String {
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

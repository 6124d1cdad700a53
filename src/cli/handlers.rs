// src/cli/handlers.rs
//! The single-command pipeline: catalog -> registry -> scheduler ->
//! aggregate -> update or check.

use super::args::Cli;
use crate::catalog;
use crate::config::Config;
use crate::diff;
use crate::engine::TomlEngine;
use crate::executor;
use crate::exit::RulegateExit;
use crate::registry::Registry;
use crate::report;
use crate::results::{self, ResultMap};
use crate::scheduler::{RunReport, Scheduler, UnitJob};
use crate::snapshot::SnapshotStore;
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

/// Executes the parsed command.
///
/// # Errors
/// Returns error on fatal configuration problems (unknown rule, missing
/// corpus root, invalid config file) before any scheduling begins.
pub fn execute(cli: &Cli) -> Result<RulegateExit> {
    let start = Instant::now();
    let config = load_config(cli)?;

    let rules = Registry::builtin().resolve(cli.rule.as_deref())?;
    let rule_names: Vec<String> = rules.iter().map(|r| r.name().to_string()).collect();

    let targets = catalog::discover(&config.corpus, &config)?;
    let jobs = config.effective_jobs();

    if !cli.json {
        report::print_rules(&rules);
        report::print_plan(&targets, jobs);
    }

    // An empty catalog is a successful zero-work run; it must not touch
    // existing baselines or report drift.
    if targets.is_empty() {
        if cli.json {
            println!("{}", report::json_report(&diff::Verdict::default(), &[])?);
        }
        return Ok(RulegateExit::Success);
    }

    let mut run = run_battery(&config, targets, rules, jobs);
    let merged = results::merge(std::mem::take(&mut run.fragments));
    for (rule, file) in &merged.collisions {
        eprintln!("WARN: rule {rule} saw file {file} in more than one target");
    }

    let mut actual = merged.map;
    for rule in &rule_names {
        actual.ensure_rule(rule);
    }

    report::print_failures(&run.failures);

    let store = SnapshotStore::new(&config.snapshots);
    if cli.update {
        return update_baselines(&store, &actual, &run, &rule_names);
    }
    check_baselines(cli, &store, &actual, &run, &rule_names, start)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(corpus) = &cli.corpus {
        config.corpus = corpus.clone();
    }
    if let Some(snapshots) = &cli.snapshots {
        config.snapshots = snapshots.clone();
    }
    if let Some(jobs) = cli.jobs {
        config.jobs = jobs;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    config.verbose = cli.verbose;
    Ok(config)
}

fn run_battery(
    config: &Config,
    targets: Vec<catalog::Target>,
    rules: Vec<Arc<dyn crate::rules::Rule>>,
    jobs: usize,
) -> RunReport {
    let engine = Arc::new(TomlEngine::new(config.corpus.clone()));
    let job: Arc<UnitJob> =
        Arc::new(move |target| executor::analyze(engine.as_ref(), target, &rules));

    Scheduler::new(jobs)
        .with_timeout(config.unit_timeout())
        .run(targets, job)
}

fn update_baselines(
    store: &SnapshotStore,
    actual: &ResultMap,
    run: &RunReport,
    rule_names: &[String],
) -> Result<RulegateExit> {
    store.save(actual)?;
    report::print_update_summary(rule_names.len(), &run.failures);
    if run.all_succeeded() {
        Ok(RulegateExit::Success)
    } else {
        Ok(RulegateExit::ExecFailed)
    }
}

fn check_baselines(
    cli: &Cli,
    store: &SnapshotStore,
    actual: &ResultMap,
    run: &RunReport,
    rule_names: &[String],
    start: Instant,
) -> Result<RulegateExit> {
    let expected = store.load(rule_names);
    let verdict = diff::diff(actual, &expected);

    if cli.json {
        println!("{}", report::json_report(&verdict, &run.failures)?);
    } else {
        report::print_verdict(&verdict);
        report::print_summary(&verdict, &run.failures, start.elapsed());
    }

    if !verdict.passed() {
        Ok(RulegateExit::CheckFailed)
    } else if !run.all_succeeded() {
        Ok(RulegateExit::ExecFailed)
    } else {
        Ok(RulegateExit::Success)
    }
}

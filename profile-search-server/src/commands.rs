//! Offline commands behind `profile-search search|filter|init-config`.

use anyhow::Context;
use profile_search_common::{Config, MatchMode};
use profile_search_core::{evaluate, search_any, Criteria, LoadOptions, Snapshot};
use serde_json::{json, Value};
use std::path::Path;

pub fn load_snapshot(config: &Config) -> anyhow::Result<Snapshot> {
    let opts = LoadOptions::try_from(&config.dataset)?;
    Ok(Snapshot::load(Path::new(&config.dataset.path), &opts))
}

/// Criteria JSON given inline, or read from a file when prefixed with `@`.
pub fn read_criteria(arg: &str) -> anyhow::Result<Vec<u8>> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read(path).with_context(|| format!("reading criteria file {path}")),
        None => Ok(arg.as_bytes().to_vec()),
    }
}

/// `--mode` beats the body's `mode`, which beats the configured default.
pub fn resolve_mode(flag: Option<MatchMode>, criteria: &Criteria, default: MatchMode) -> MatchMode {
    flag.or(criteria.mode).unwrap_or(default)
}

pub fn filter(config: &Config, criteria_arg: &str, mode: Option<MatchMode>) -> anyhow::Result<Value> {
    let criteria = Criteria::from_json(&read_criteria(criteria_arg)?, config.search.term_separator)?;
    let mode = resolve_mode(mode, &criteria, config.search.default_mode);
    let snapshot = load_snapshot(config)?;
    let results = evaluate(snapshot.dataset()?, &criteria, mode)?;
    Ok(json!({ "results": results }))
}

pub fn search(config: &Config, query: &str) -> anyhow::Result<Value> {
    let snapshot = load_snapshot(config)?;
    let rows = search_any(snapshot.dataset()?, query)?;
    Ok(serde_json::to_value(rows)?)
}

/// Refuses to replace an existing file unless `force` is set.
pub fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default().save_to(path)?;
    Ok(())
}

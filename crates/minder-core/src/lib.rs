pub mod cli;
pub mod commands;
pub mod config;
pub mod filter;
pub mod i18n;
pub mod render;
pub mod seed;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

use std::ffi::OsString;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting minder CLI");

    let mut cfg = config::Config::load(cli.minderrc.as_deref())?;
    cfg.apply_overrides(cli.rc_overrides.into_iter().map(|kv| (kv.key, kv.value)));

    let data_dir = config::resolve_data_dir(&cfg, cli.data.as_deref())
        .context("failed to resolve data directory")?;

    let storage = storage::Storage::open(&data_dir)
        .with_context(|| format!("failed to open storage at {}", data_dir.display()))?;

    let lang = resolve_lang(&storage, &cfg);
    let theme = resolve_theme(&storage, &cfg);

    let mut store = store::TaskStore::open(storage);

    let now = Utc::now();
    commands::auto_seed(&mut store, &cfg, lang, now);

    let renderer = render::Renderer::new(&cfg, theme, lang)?;
    let command = cli
        .command
        .unwrap_or(cli::Command::List { filter: None });

    commands::dispatch(&mut store, &cfg, renderer, command, now)?;

    info!("done");
    Ok(())
}

/// Persisted preference wins over the config key; anything unparseable
/// falls back to English.
fn resolve_lang(storage: &storage::Storage, cfg: &config::Config) -> i18n::Lang {
    let raw = storage.read_language().or_else(|| cfg.get("language"));
    match raw.map(|s| s.parse::<i18n::Lang>()) {
        Some(Ok(lang)) => lang,
        Some(Err(err)) => {
            warn!(error = %err, "invalid language preference; using English");
            i18n::Lang::default()
        }
        None => i18n::Lang::default(),
    }
}

fn resolve_theme(storage: &storage::Storage, cfg: &config::Config) -> render::Theme {
    let raw = storage.read_theme().or_else(|| cfg.get("theme"));
    match raw.map(|s| s.parse::<render::Theme>()) {
        Some(Ok(theme)) => theme,
        Some(Err(err)) => {
            warn!(error = %err, "invalid theme preference; using dark");
            render::Theme::default()
        }
        None => render::Theme::default(),
    }
}

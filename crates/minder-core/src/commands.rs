use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::cli::Command;
use crate::config::Config;
use crate::filter::Filter;
use crate::i18n::{self, Lang};
use crate::render::{Renderer, Theme};
use crate::seed::HttpSeedSource;
use crate::store::TaskStore;

/// Routes one parsed command to its handler. The renderer is registered as
/// the store's observer first, so every mutation below prints the fresh
/// list and summary without the handlers doing it themselves.
#[instrument(skip(store, cfg, renderer, command, now))]
pub fn dispatch(
    store: &mut TaskStore,
    cfg: &Config,
    renderer: Renderer,
    command: Command,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let lang = renderer.lang();
    let mut renderer = renderer;
    store.subscribe(Box::new(move |snapshot| {
        if let Err(err) = renderer.render(snapshot, now) {
            warn!(error = %err, "render failed");
        }
    }));

    debug!(?command, "dispatching command");

    match command {
        Command::Add { text, due } => cmd_add(store, &text.join(" "), due, now),
        Command::List { filter } => cmd_list(store, filter),
        Command::Toggle { id } => cmd_toggle(store, &id),
        Command::Edit { id, text } => cmd_edit(store, &id, &text.join(" ")),
        Command::Remove { id } => cmd_remove(store, &id),
        Command::ClearCompleted => cmd_clear_completed(store),
        Command::Sort => cmd_sort(store),
        Command::Seed => cmd_seed(store, cfg, lang, now),
        Command::Lang { lang: choice } => cmd_lang(store, choice),
        Command::Theme { theme: choice } => cmd_theme(store, choice),
    }
}

pub fn seed_source_from_config(cfg: &Config) -> HttpSeedSource {
    let url = cfg
        .get("seed.url")
        .unwrap_or_else(|| crate::seed::DEFAULT_SEED_URL.to_string());
    HttpSeedSource::new(url)
}

/// Startup population: runs when the loaded collection is empty and
/// `seed.auto` is on. Failure prints the localized notice and the
/// invocation carries on.
#[instrument(skip(store, cfg, now))]
pub fn auto_seed(store: &mut TaskStore, cfg: &Config, lang: Lang, now: DateTime<Utc>) {
    if !store.is_empty() {
        return;
    }
    if !cfg.get_bool("seed.auto").unwrap_or(true) {
        debug!("auto-seed disabled");
        return;
    }

    let source = seed_source_from_config(cfg);
    match store.seed(&source, now) {
        Ok(count) => debug!(count, "auto-seed finished"),
        Err(err) => {
            warn!(error = %err, "auto-seed failed");
            eprintln!("{}", i18n::t(lang, "seed-failed"));
        }
    }
}

#[instrument(skip(store, text, now))]
fn cmd_add(
    store: &mut TaskStore,
    text: &str,
    due: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command add");

    match store.create(text, due, now)? {
        Some(id) => println!("Created task {}.", &id.simple().to_string()[..8]),
        None => debug!("blank text; nothing added"),
    }
    Ok(())
}

#[instrument(skip(store))]
fn cmd_list(store: &mut TaskStore, filter: Option<Filter>) -> anyhow::Result<()> {
    info!("command list");

    let filter = filter.unwrap_or_else(|| store.filter());
    store.set_filter(filter);
    Ok(())
}

#[instrument(skip(store))]
fn cmd_toggle(store: &mut TaskStore, needle: &str) -> anyhow::Result<()> {
    info!("command toggle");

    let Some(id) = resolve_id(store, needle)? else {
        debug!(needle, "no matching task");
        return Ok(());
    };
    store.toggle(id)?;
    Ok(())
}

#[instrument(skip(store, text))]
fn cmd_edit(store: &mut TaskStore, needle: &str, text: &str) -> anyhow::Result<()> {
    info!("command edit");

    let Some(id) = resolve_id(store, needle)? else {
        debug!(needle, "no matching task");
        return Ok(());
    };
    if store.edit(id, text)? {
        println!("Modified 1 task.");
    }
    Ok(())
}

#[instrument(skip(store))]
fn cmd_remove(store: &mut TaskStore, needle: &str) -> anyhow::Result<()> {
    info!("command remove");

    let Some(id) = resolve_id(store, needle)? else {
        debug!(needle, "no matching task");
        return Ok(());
    };
    if store.remove(id)? {
        println!("Deleted 1 task.");
    }
    Ok(())
}

#[instrument(skip(store))]
fn cmd_clear_completed(store: &mut TaskStore) -> anyhow::Result<()> {
    info!("command clear-completed");

    let removed = store.clear_completed()?;
    if removed > 0 {
        println!("Cleared {removed} completed task(s).");
    }
    Ok(())
}

#[instrument(skip(store))]
fn cmd_sort(store: &mut TaskStore) -> anyhow::Result<()> {
    info!("command sort");

    store.sort_by_due()
}

#[instrument(skip(store, cfg, now))]
fn cmd_seed(
    store: &mut TaskStore,
    cfg: &Config,
    lang: Lang,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command seed");

    let source = seed_source_from_config(cfg);
    match store.seed(&source, now) {
        Ok(0) => println!("No starter tasks added."),
        Ok(count) => println!("Added {count} starter task(s)."),
        Err(err) => {
            warn!(error = %err, "seed failed");
            eprintln!("{}", i18n::t(lang, "seed-failed"));
        }
    }
    Ok(())
}

#[instrument(skip(store))]
fn cmd_lang(store: &mut TaskStore, choice: Lang) -> anyhow::Result<()> {
    info!("command lang");

    store.storage().write_language(choice.as_str())?;
    println!("Language set to {}.", choice.as_str());
    Ok(())
}

#[instrument(skip(store))]
fn cmd_theme(store: &mut TaskStore, choice: Theme) -> anyhow::Result<()> {
    info!("command theme");

    store.storage().write_theme(choice.as_str())?;
    println!("Theme set to {}.", choice.as_str());
    Ok(())
}

/// Resolves a full uuid or a unique prefix of the simple uuid form. An
/// ambiguous prefix is an error; an unknown one resolves to `None` and the
/// caller treats it as a silent no-op.
fn resolve_id(store: &TaskStore, needle: &str) -> anyhow::Result<Option<Uuid>> {
    if let Ok(id) = Uuid::parse_str(needle) {
        return Ok(Some(id));
    }

    let needle = needle.to_ascii_lowercase();
    let mut matches = store
        .tasks()
        .iter()
        .filter(|task| task.id.simple().to_string().starts_with(&needle));

    let Some(first) = matches.next() else {
        return Ok(None);
    };
    if matches.next().is_some() {
        return Err(anyhow!("task id prefix '{needle}' is ambiguous"));
    }
    Ok(Some(first.id))
}

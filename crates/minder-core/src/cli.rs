use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::filter::Filter;
use crate::i18n::Lang;
use crate::render::Theme;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "minder",
    version,
    about = "Minder: a persistent to-do list for the terminal",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "minderrc", global = true)]
    pub minderrc: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task to the front of the list.
    Add {
        /// Task text; multiple words are joined with spaces.
        #[arg(required = true)]
        text: Vec<String>,

        /// Optional due date (YYYY-MM-DD).
        #[arg(
            long = "due",
            value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<NaiveDate>())
        )]
        due: Option<NaiveDate>,
    },

    /// Show tasks under a filter (all, active or done).
    List {
        #[arg(
            long = "filter",
            value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<Filter>())
        )]
        filter: Option<Filter>,
    },

    /// Flip a task between done and active.
    #[command(alias = "done")]
    Toggle {
        /// Task id or unique id prefix.
        id: String,
    },

    /// Replace a task's text; a blank replacement leaves it unchanged.
    Edit {
        /// Task id or unique id prefix.
        id: String,

        /// Replacement text.
        text: Vec<String>,
    },

    /// Delete a task.
    #[command(aliases = ["rm", "delete"])]
    Remove {
        /// Task id or unique id prefix.
        id: String,
    },

    /// Drop every completed task.
    #[command(name = "clear-completed", alias = "clear")]
    ClearCompleted,

    /// Reorder tasks by due date; undated tasks go last.
    Sort,

    /// Fetch starter tasks when the list is empty.
    Seed,

    /// Set the display language (en, pt or he).
    Lang {
        #[arg(value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<Lang>()))]
        lang: Lang,
    },

    /// Set the display theme (dark or light).
    Theme {
        #[arg(value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<Theme>()))]
        theme: Theme,
    },
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

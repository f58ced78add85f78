use std::io::{self, IsTerminal, Write};
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::i18n::{self, Lang};
use crate::store::Snapshot;
use crate::task::Task;
use crate::view::{self, Projection};

/// Accent palette preference, persisted independently of the task data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    fn accent_code(self) -> &'static str {
        match self {
            Theme::Dark => "33",
            Theme::Light => "34",
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(anyhow!("unknown theme: {other} (expected dark or light)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    theme: Theme,
    lang: Lang,
}

impl Renderer {
    pub fn new(cfg: &Config, theme: Theme, lang: Lang) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color, theme, lang })
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Prints the visible tasks and the summary line for one snapshot.
    #[tracing::instrument(skip(self, snapshot, now))]
    pub fn render(&mut self, snapshot: Snapshot<'_>, now: DateTime<Utc>) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        match view::project(snapshot.tasks, snapshot.filter) {
            Projection::Empty => {
                writeln!(out, "{}", i18n::t(self.lang, "empty-message"))?;
            }
            Projection::List(visible) => {
                self.write_task_rows(&mut out, &visible, now)?;
            }
        }

        let remaining = view::remaining(snapshot.tasks);
        if remaining == 0 {
            writeln!(out, "{}", i18n::t(self.lang, "all-done"))?;
        } else {
            writeln!(
                out,
                "{}",
                i18n::t_count(self.lang, "tasks-remaining", remaining)
            )?;
        }

        Ok(())
    }

    fn write_task_rows<W: Write>(
        &self,
        out: &mut W,
        tasks: &[&Task],
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let today = now.date_naive();
        let mut rows = Vec::with_capacity(tasks.len());

        for task in tasks {
            let id = self.paint(&task.short_id(), self.theme.accent_code());
            let marker = if task.done { "[x]" } else { "[ ]" }.to_string();

            let due = task
                .due_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            let due = if task.is_overdue(today) {
                let label = format!("{due} ({})", i18n::t(self.lang, "overdue"));
                self.paint(&label, "31")
            } else {
                due
            };

            let text = if task.done {
                self.paint(&task.text, "9")
            } else {
                task.text.clone()
            };

            rows.push(vec![id, marker, due, text]);
        }

        write_rows(out, rows)?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_rows<W: Write>(mut writer: W, rows: Vec<Vec<String>>) -> anyhow::Result<()> {
    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; column_count];

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if idx + 1 == row.len() {
                write!(writer, "{cell}")?;
            } else {
                let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
                let padding = widths[idx].saturating_sub(visible_width);
                write!(writer, "{}{} ", cell, " ".repeat(padding))?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::task::Task;

/// Durable key-value store backed by one file per key inside the data
/// directory: the serialized task collection plus the independent language
/// and theme preferences.
#[derive(Debug)]
pub struct Storage {
    pub data_dir: PathBuf,
    pub tasks_path: PathBuf,
    pub language_path: PathBuf,
    pub theme_path: PathBuf,
}

impl Storage {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let tasks_path = data_dir.join("tasks.data");
        let language_path = data_dir.join("language.data");
        let theme_path = data_dir.join("theme.data");

        if !tasks_path.exists() {
            fs::write(&tasks_path, "")?;
        }
        if !language_path.exists() {
            fs::write(&language_path, "")?;
        }
        if !theme_path.exists() {
            fs::write(&theme_path, "")?;
        }

        info!(
            data_dir = %data_dir.display(),
            tasks = %tasks_path.display(),
            "opened storage"
        );

        Ok(Self {
            data_dir,
            tasks_path,
            language_path,
            theme_path,
        })
    }

    /// Absent or unreadable task data yields an empty collection instead of
    /// an error; a reload must never take the task list down with it.
    #[tracing::instrument(skip(self))]
    pub fn load_tasks(&self) -> Vec<Task> {
        match load_jsonl(&self.tasks_path) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    file = %self.tasks_path.display(),
                    error = %err,
                    "task data unreadable; starting empty"
                );
                Vec::new()
            }
        }
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn save_tasks(&self, tasks: &[Task]) -> anyhow::Result<()> {
        save_jsonl_atomic(&self.tasks_path, tasks).context("failed to save tasks.data")
    }

    #[tracing::instrument(skip(self))]
    pub fn read_language(&self) -> Option<String> {
        read_value(&self.language_path)
    }

    #[tracing::instrument(skip(self))]
    pub fn write_language(&self, value: &str) -> anyhow::Result<()> {
        write_value(&self.language_path, value)
    }

    #[tracing::instrument(skip(self))]
    pub fn read_theme(&self) -> Option<String> {
        read_value(&self.theme_path)
    }

    #[tracing::instrument(skip(self))]
    pub fn write_theme(&self, value: &str) -> anyhow::Result<()> {
        write_value(&self.theme_path, value)
    }
}

#[tracing::instrument(skip(path))]
fn load_jsonl(path: &Path) -> anyhow::Result<Vec<Task>> {
    debug!(file = %path.display(), "loading jsonl");
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let task: Task = serde_json::from_str(trimmed)
            .with_context(|| format!("failed parsing {} line {}", path.display(), idx + 1))?;
        out.push(task);
    }

    debug!(count = out.len(), "loaded tasks from jsonl");
    Ok(out)
}

#[tracing::instrument(skip(path, tasks))]
fn save_jsonl_atomic(path: &Path, tasks: &[Task]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = tasks.len(), "saving jsonl atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    for task in tasks {
        let serialized = serde_json::to_string(task)?;
        writeln!(temp, "{serialized}")?;
    }
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}

fn read_value(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn write_value(path: &Path, value: &str) -> anyhow::Result<()> {
    fs::write(path, value).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(())
}

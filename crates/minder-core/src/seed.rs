use anyhow::{Context, bail};
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_SEED_URL: &str = "https://jsonplaceholder.typicode.com/todos?_limit=5";

/// One record from the remote placeholder feed. Extra fields in the payload
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedItem {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Read-only source of starter tasks. The store consults it only when the
/// collection is empty.
pub trait SeedSource {
    fn fetch(&self) -> anyhow::Result<Vec<SeedItem>>;
}

#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    url: String,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl SeedSource for HttpSeedSource {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    fn fetch(&self) -> anyhow::Result<Vec<SeedItem>> {
        info!("fetching starter tasks");

        let resp = reqwest::blocking::Client::new()
            .get(&self.url)
            .send()
            .context("seed request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("seed endpoint returned {status}");
        }

        let items: Vec<SeedItem> = resp.json().context("failed to decode seed payload")?;
        debug!(count = items.len(), "seed payload decoded");
        Ok(items)
    }
}

use anyhow::Context;
use std::path::PathBuf;
use strongbuy_core::ingest::PageFetcher;

/// Serves a saved copy of the screener page, ignoring the requested URL.
#[derive(Debug, Clone)]
pub struct FilePageFetcher {
    path: PathBuf,
}

impl FilePageFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl PageFetcher for FilePageFetcher {
    async fn fetch(&self, _url: &str) -> anyhow::Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read markup file {}", self.path.display()))
    }
}

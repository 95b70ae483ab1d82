//! JSONL Journal - Append-only Daily Session Logs
//!
//! Persists journal entries to daily JSONL files in the format
//! `journal/YYYY-MM-DD.jsonl`. Each line is a self-contained JSON
//! object tagged with its `event` kind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use crate::ports::journal::{JournalEntry, TradeJournal};

/// Append-only JSONL journal with daily file rotation.
pub struct JsonlJournal {
    /// Directory holding the daily files.
    journal_dir: PathBuf,
}

impl JsonlJournal {
    /// Create a journal under `<data_dir>/journal`, creating it if needed.
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let journal_dir = data_dir.as_ref().join("journal");

        fs::create_dir_all(&journal_dir)
            .await
            .with_context(|| {
                format!("Failed to create journal directory {}", journal_dir.display())
            })?;

        Ok(Self { journal_dir })
    }

    /// Path of today's journal file.
    pub fn current_path(&self) -> PathBuf {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        self.journal_dir.join(format!("{date}.jsonl"))
    }
}

#[async_trait]
impl TradeJournal for JsonlJournal {
    #[instrument(skip(self, entry), fields(session_id = %entry.session_id()))]
    async fn append(&self, entry: &JournalEntry) -> Result<()> {
        let path = self.current_path();

        let mut json = serde_json::to_string(entry)
            .context("Failed to serialize journal entry")?;
        json.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open journal file {}", path.display()))?;

        file.write_all(json.as_bytes())
            .await
            .context("Failed to write journal entry")?;

        file.flush().await.context("Failed to flush journal")?;

        debug!(path = %path.display(), "Journal entry appended");
        Ok(())
    }

    /// The journal directory is writable.
    async fn is_healthy(&self) -> bool {
        let probe = self.journal_dir.join(".health_check");
        let result = fs::write(&probe, b"ok").await;
        let _ = fs::remove_file(&probe).await;
        result.is_ok()
    }
}

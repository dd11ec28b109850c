// Audit logger that appends JSONL records

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single audit entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditRecord {
    /// UTC, ISO-8601 without a zone suffix
    #[serde(with = "iso_naive")]
    pub timestamp: NaiveDateTime,

    /// The query exactly as submitted
    pub input: String,

    /// Cloud answer text
    pub cloud_response: String,

    /// Local model's review of the cloud answer
    pub local_validation: String,

    /// Why the review is missing (strict mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_error: Option<String>,
}

impl AuditRecord {
    pub fn new(
        input: impl Into<String>,
        cloud_response: impl Into<String>,
        local_validation: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().naive_utc(),
            input: input.into(),
            cloud_response: cloud_response.into(),
            local_validation: local_validation.into(),
            review_error: None,
        }
    }

    pub fn with_review_error(mut self, error: impl Into<String>) -> Self {
        self.review_error = Some(error.into());
        self
    }
}

mod iso_naive {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<NaiveDateTime>().map_err(serde::de::Error::custom)
    }
}

/// Append-only JSONL audit log
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a logger, making the parent directory if needed.
    pub fn new(log_path: PathBuf) -> Result<Self> {
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create audit log directory: {}", parent.display())
            })?;
        }

        Ok(Self { log_path })
    }

    /// Append one record as a single line.
    ///
    /// The whole line goes out in one `write_all` while an exclusive lock is
    /// held on the file.
    pub fn append(&self, record: &AuditRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).context("Failed to serialize audit record")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        file.lock_exclusive()
            .with_context(|| format!("Failed to lock audit log: {}", self.log_path.display()))?;

        let written = file
            .write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .with_context(|| format!("Failed to write audit log: {}", self.log_path.display()));

        // Released on close as well; unlocking early just shortens the wait
        // for other writers.
        let _ = FileExt::unlock(&file);

        written?;
        debug!("Appended audit record to {}", self.log_path.display());
        Ok(())
    }

    /// [`append`](Self::append) on the blocking pool.
    pub async fn append_async(&self, record: AuditRecord) -> Result<()> {
        let logger = self.clone();
        tokio::task::spawn_blocking(move || logger.append(&record))
            .await
            .context("Audit log writer task failed")?
    }

    /// Read every record. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<AuditRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;
        file.lock_shared()
            .with_context(|| format!("Failed to lock audit log: {}", self.log_path.display()))?;
        let contents = fs::read_to_string(&self.log_path);
        let _ = FileExt::unlock(&file);
        let contents = contents
            .with_context(|| format!("Failed to read audit log: {}", self.log_path.display()))?;

        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("Malformed audit record on line {}", idx + 1))
            })
            .collect()
    }

    /// The last `n` records, oldest first.
    pub fn tail(&self, n: usize) -> Result<Vec<AuditRecord>> {
        let mut records = self.read_all()?;
        let skip = records.len().saturating_sub(n);
        Ok(records.split_off(skip))
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

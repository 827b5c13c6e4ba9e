//! Append-only analysis history.
//!
//! Each completed analysis is appended as one JSON line keyed by the
//! creator's normalized identity. Entries are never overwritten or
//! deleted; a `Mutex` serializes writers so sequence numbers stay
//! monotonic for concurrent `record` calls.

use crate::models::{AnalysisResult, HistoryEntry};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Defect while reading or appending the history log.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

struct Inner {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
    next_sequence: u64,
}

/// File-backed append-only store of retained analysis results.
pub struct HistoryStore {
    inner: Mutex<Inner>,
}

impl HistoryStore {
    /// Open (or create) a history store at the given path.
    ///
    /// Corrupt lines are skipped with a warning rather than failing the
    /// whole store; valid entries before and after them are kept.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        let mut entries = Vec::new();

        if path.exists() {
            let file = File::open(path)?;
            for (line_no, line) in BufReader::new(file).lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<HistoryEntry>(&line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => warn!(
                        "skipping corrupt history entry at {}:{}: {}",
                        path.display(),
                        line_no + 1,
                        e
                    ),
                }
            }
        }

        let next_sequence = entries.iter().map(|e| e.sequence).max().map_or(1, |s| s + 1);
        debug!(
            "opened history store {} with {} entries",
            path.display(),
            entries.len()
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                path: path.to_path_buf(),
                entries,
                next_sequence,
            }),
        })
    }

    /// Append one completed analysis. Never overwrites prior entries.
    ///
    /// The entry is fully serialized before anything touches the file,
    /// and written as a single line plus flush: either the whole entry
    /// is recorded or nothing is.
    pub fn record(&self, result: AnalysisResult) -> Result<HistoryEntry, HistoryError> {
        let mut inner = self.inner.lock().expect("history store mutex poisoned");

        let entry = HistoryEntry {
            identity: result.profile.identity_key(),
            sequence: inner.next_sequence,
            recorded_at: Utc::now(),
            result,
        };

        let line = serde_json::to_string(&entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&inner.path)?;
        writeln!(file, "{}", line)?;
        file.flush()?;

        inner.next_sequence += 1;
        inner.entries.push(entry.clone());
        debug!(
            "recorded analysis #{} for {}",
            entry.sequence, entry.identity
        );

        Ok(entry)
    }

    /// Last `n` entries for an identity, most recent first.
    ///
    /// An unknown identity returns an empty vec, not an error.
    pub fn compare(&self, identity: &str, n: usize) -> Vec<HistoryEntry> {
        let inner = self.inner.lock().expect("history store mutex poisoned");
        let key = identity.trim().to_lowercase();

        inner
            .entries
            .iter()
            .filter(|e| e.identity == key)
            .rev()
            .take(n)
            .cloned()
            .collect()
    }

    /// Number of retained entries across all identities.
    #[allow(dead_code)] // Utility for store inspection
    pub fn len(&self) -> usize {
        self.inner.lock().expect("history store mutex poisoned").entries.len()
    }

    /// True when no analysis has been retained yet.
    #[allow(dead_code)] // Utility for store inspection
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

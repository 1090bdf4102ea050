//! history.rs — bounded in-memory journal of saved score estimates, with a
//! trend readout over the two most recent saves. Persistence round-trips the
//! whole journal as JSON through the storage capability.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::calibration::anon_hash;
use crate::score::CompositeScore;
use crate::storage::{ScoreStore, HISTORY_KEY};

pub const DEFAULT_JOURNAL_CAP: usize = 200;

/// One saved estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: String,
    pub date: NaiveDate,
    pub total: u32,
    pub rw: u32,
    pub math: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Direction of the most recent change, with the point delta where it moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", content = "delta", rename_all = "lowercase")]
pub enum Trend {
    Up(u32),
    Down(u32),
    Flat,
}

#[derive(Debug)]
pub struct ScoreJournal {
    inner: Mutex<Vec<ScoreEntry>>,
    cap: usize,
    seq: AtomicU64,
}

impl ScoreJournal {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
            seq: AtomicU64::new(0),
        }
    }

    /// Append one entry, dropping the oldest beyond capacity. Returns the
    /// stored entry with its generated id.
    pub fn add(&self, total: u32, rw: u32, math: u32, label: Option<String>) -> ScoreEntry {
        let date = Utc::now().date_naive();
        // seq guards same-instant saves, nanos guard restarts; the id stays a
        // short opaque hex string either way.
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let nonce = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let id = anon_hash(&format!(
            "{date}|{total}|{rw}|{math}|{}|{seq}|{nonce}",
            label.as_deref().unwrap_or_default()
        ));
        let entry = ScoreEntry {
            id,
            date,
            total,
            rw,
            math,
            label,
        };

        let mut v = self.inner.lock().expect("journal mutex poisoned");
        v.push(entry.clone());
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
        entry
    }

    pub fn add_composite(&self, c: &CompositeScore, label: Option<String>) -> ScoreEntry {
        self.add(c.total, c.rw.scaled, c.math.scaled, label)
    }

    /// Remove by id; true if an entry was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut v = self.inner.lock().expect("journal mutex poisoned");
        let before = v.len();
        v.retain(|e| e.id != id);
        v.len() != before
    }

    pub fn clear(&self) {
        self.inner.lock().expect("journal mutex poisoned").clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("journal mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<ScoreEntry> {
        let v = self.inner.lock().expect("journal mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }

    /// Delta between the two most recent saves. None below two entries.
    pub fn trend(&self) -> Option<Trend> {
        let v = self.inner.lock().expect("journal mutex poisoned");
        let len = v.len();
        if len < 2 {
            return None;
        }
        let prev = v[len - 2].total;
        let last = v[len - 1].total;
        Some(if last > prev {
            Trend::Up(last - prev)
        } else if last < prev {
            Trend::Down(prev - last)
        } else {
            Trend::Flat
        })
    }

    /// Persist the whole journal under the history key.
    pub async fn save_to(&self, store: &dyn ScoreStore) -> anyhow::Result<()> {
        let entries = self.snapshot_last_n(self.cap);
        let json = serde_json::to_string(&entries)?;
        store.set(HISTORY_KEY, &json).await
    }

    /// Replace the journal with the persisted snapshot, if any. Returns how
    /// many entries were restored.
    pub async fn load_from(&self, store: &dyn ScoreStore) -> anyhow::Result<usize> {
        let Some(json) = store.get(HISTORY_KEY).await? else {
            return Ok(0);
        };
        let mut entries: Vec<ScoreEntry> = serde_json::from_str(&json)?;
        if entries.len() > self.cap {
            let excess = entries.len() - self.cap;
            entries.drain(0..excess);
        }
        let n = entries.len();
        let mut v = self.inner.lock().expect("journal mutex poisoned");
        *v = entries;
        Ok(n)
    }
}

impl Default for ScoreJournal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAP)
    }
}

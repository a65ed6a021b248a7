//! Majlis Score Table
//!
//! Process-lifetime point totals per user, plus the leaderboard snapshot

use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("score amount must be positive")]
    InvalidAmount,
    #[error("score table lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub user_id: String,
    pub points: u64,
}

/// Storage seam for user points. Implementations must make `add` atomic per
/// user so concurrent increments are never lost.
pub trait ScoreTable: Send + Sync {
    /// Add `amount` (> 0) to the user's total and return the new total.
    fn add(&self, user_id: &str, amount: u64) -> Result<u64, ScoreError>;

    /// Current total, 0 for users never scored.
    fn get(&self, user_id: &str) -> Result<u64, ScoreError>;

    /// Up to `n` entries, highest first. Ties keep first-scored order.
    fn top(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError>;

    fn len(&self) -> Result<usize, ScoreError>;

    fn is_empty(&self) -> Result<bool, ScoreError> {
        Ok(self.len()? == 0)
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<ScoreEntry>,
    index: HashMap<String, usize>,
}

/// In-memory table. Entries are kept in first-scored order so the stable
/// sort in `top` breaks ties by insertion.
#[derive(Debug, Default)]
pub struct MemoryScoreTable {
    inner: RwLock<Inner>,
}

impl MemoryScoreTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreTable for MemoryScoreTable {
    fn add(&self, user_id: &str, amount: u64) -> Result<u64, ScoreError> {
        if amount == 0 {
            return Err(ScoreError::InvalidAmount);
        }

        let mut inner = self.inner.write().map_err(|_| ScoreError::Poisoned)?;
        let existing = inner.index.get(user_id).copied();
        let slot = match existing {
            Some(slot) => slot,
            None => {
                let slot = inner.entries.len();
                inner.entries.push(ScoreEntry {
                    user_id: user_id.to_string(),
                    points: 0,
                });
                inner.index.insert(user_id.to_string(), slot);
                slot
            }
        };

        let entry = &mut inner.entries[slot];
        entry.points = entry.points.saturating_add(amount);
        Ok(entry.points)
    }

    fn get(&self, user_id: &str) -> Result<u64, ScoreError> {
        let inner = self.inner.read().map_err(|_| ScoreError::Poisoned)?;
        Ok(inner
            .index
            .get(user_id)
            .map(|slot| inner.entries[*slot].points)
            .unwrap_or(0))
    }

    fn top(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        let mut snapshot = {
            let inner = self.inner.read().map_err(|_| ScoreError::Poisoned)?;
            inner.entries.clone()
        };
        snapshot.sort_by(|a, b| b.points.cmp(&a.points));
        snapshot.truncate(n);
        Ok(snapshot)
    }

    fn len(&self) -> Result<usize, ScoreError> {
        let inner = self.inner.read().map_err(|_| ScoreError::Poisoned)?;
        Ok(inner.entries.len())
    }
}

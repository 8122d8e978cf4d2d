//! Client-local daily limit on auto-generated captions.
//!
//! This is a UX nicety, not a security control: deleting the state file
//! restores the credits.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;

use crate::foundation::error::ForgeResult;

/// Remaining credits for one calendar day.
///
/// Persisted as `{ "date": "YYYY-MM-DD", "count": n }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DailyQuota {
    pub date: NaiveDate,
    #[serde(rename = "count")]
    pub remaining: u32,
}

impl DailyQuota {
    pub fn fresh(today: NaiveDate, max: u32) -> Self {
        Self {
            date: today,
            remaining: max,
        }
    }

    /// Reset to `max` if the stored date is not `today`.
    pub fn rolled_to(self, today: NaiveDate, max: u32) -> Self {
        if self.date == today {
            self
        } else {
            Self::fresh(today, max)
        }
    }
}

/// Spend one credit if any are left today.
///
/// Returns whether the call was allowed and the state to persist. A denied
/// call returns the (possibly day-rolled) state unchanged.
pub fn check_and_consume(state: DailyQuota, today: NaiveDate, max: u32) -> (bool, DailyQuota) {
    let state = state.rolled_to(today, max);
    if state.remaining > 0 {
        (
            true,
            DailyQuota {
                remaining: state.remaining - 1,
                ..state
            },
        )
    } else {
        (false, state)
    }
}

/// JSON file holding the single [`DailyQuota`] value.
#[derive(Clone, Debug)]
pub struct QuotaStore {
    path: PathBuf,
}

impl QuotaStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state for `today`, resetting and persisting it when it is
    /// missing, malformed or from another day.
    pub fn open(&self, today: NaiveDate, max: u32) -> ForgeResult<DailyQuota> {
        if let Some(q) = self.stored_for(today, max)? {
            return Ok(q);
        }
        let q = DailyQuota::fresh(today, max);
        self.save(&q)?;
        Ok(q)
    }

    /// The state `open` would return for `today`, without writing anything.
    pub fn peek(&self, today: NaiveDate, max: u32) -> ForgeResult<DailyQuota> {
        Ok(self
            .stored_for(today, max)?
            .unwrap_or_else(|| DailyQuota::fresh(today, max)))
    }

    /// Stored same-day state, with the count clamped to `max`.
    fn stored_for(&self, today: NaiveDate, max: u32) -> ForgeResult<Option<DailyQuota>> {
        Ok(self
            .read()?
            .filter(|q| q.date == today)
            .map(|q| DailyQuota {
                remaining: q.remaining.min(max),
                ..q
            }))
    }

    fn read(&self) -> ForgeResult<Option<DailyQuota>> {
        let stored = match std::fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<DailyQuota>(&bytes) {
                Ok(q) => Some(q),
                Err(err) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %err,
                        "malformed quota state, resetting"
                    );
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("read quota state '{}'", self.path.display()))
                    .into());
            }
        };
        Ok(stored)
    }

    pub fn save(&self, state: &DailyQuota) -> ForgeResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create quota dir '{}'", parent.display()))?;
        }
        let json = serde_json::to_vec(state).context("serialize quota state")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write quota state '{}'", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/quota.rs"]
mod tests;

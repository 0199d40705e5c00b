//! Most-recently-used color list.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::listeners::{Listeners, Subscription};
use crate::color;
use crate::constants::{DEFAULT_RECENT_COLORS, RECENT_COLORS_KEY};
use crate::error::PaletteError;
use crate::storage::{KeyValueStore, StorageBackend};

/// Default list, truncated to `limit`.
fn default_colors(limit: usize) -> Vec<String> {
    DEFAULT_RECENT_COLORS
        .iter()
        .take(limit)
        .map(ToString::to_string)
        .collect()
}

/// Newest-first list of captured colors, deduplicated and bounded.
///
/// The list is read from storage on first use. When nothing has been stored
/// yet the built-in default colors are shown.
pub struct RecentColorsTracker<S = StorageBackend> {
    storage: Arc<S>,
    limit: usize,
    state: RwLock<Option<Vec<String>>>,
    write_gate: Mutex<()>,
    listeners: Listeners<Vec<String>>,
}

impl<S: KeyValueStore> RecentColorsTracker<S> {
    /// Creates a tracker. Nothing is read until the first call.
    pub fn new(storage: Arc<S>, limit: usize) -> Self {
        Self {
            storage,
            limit: limit.max(1),
            state: RwLock::new(None),
            write_gate: Mutex::new(()),
            listeners: Listeners::new(),
        }
    }

    /// Maximum list length.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Current list, newest first.
    ///
    /// # Errors
    ///
    /// `PersistenceFailure` if the first read fails or the stored list is corrupted.
    pub async fn list(&self) -> Result<Vec<String>, PaletteError> {
        self.snapshot().await
    }

    /// Records a color, moving it to the front if already present.
    ///
    /// # Errors
    ///
    /// `InvalidColor` for malformed input, `PersistenceFailure` if the write fails.
    pub async fn add(&self, hex: &str) -> Result<Vec<String>, PaletteError> {
        let hex = color::validate_hex(hex)?;
        let _gate = self.write_gate.lock().await;

        let mut next = self.snapshot().await?;
        next.retain(|c| !c.eq_ignore_ascii_case(&hex));
        next.insert(0, hex);
        next.truncate(self.limit);

        self.commit(next).await
    }

    /// Removes a color. Removing an absent color changes nothing.
    ///
    /// # Errors
    ///
    /// `InvalidColor` for malformed input, `PersistenceFailure` if the write fails.
    pub async fn remove(&self, hex: &str) -> Result<Vec<String>, PaletteError> {
        let hex = color::validate_hex(hex)?;
        let _gate = self.write_gate.lock().await;

        let current = self.snapshot().await?;
        if !current.iter().any(|c| c.eq_ignore_ascii_case(&hex)) {
            return Ok(current);
        }

        let next = current
            .into_iter()
            .filter(|c| !c.eq_ignore_ascii_case(&hex))
            .collect();
        self.commit(next).await
    }

    /// Empties the list. The empty list is persisted, so defaults do not return.
    ///
    /// # Errors
    ///
    /// `PersistenceFailure` if the write fails.
    pub async fn clear(&self) -> Result<(), PaletteError> {
        let _gate = self.write_gate.lock().await;
        self.commit(Vec::new()).await?;
        info!("Cleared recent colors");
        Ok(())
    }

    /// Restores the built-in default colors.
    ///
    /// # Errors
    ///
    /// `PersistenceFailure` if the write fails.
    pub async fn reset_to_defaults(&self) -> Result<Vec<String>, PaletteError> {
        let _gate = self.write_gate.lock().await;
        let colors = self.commit(default_colors(self.limit)).await?;
        info!("Reset recent colors to defaults");
        Ok(colors)
    }

    /// Registers a callback receiving the list after each successful mutation.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Vec<String>) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    /// Returns the loaded list, reading storage on first use.
    async fn snapshot(&self) -> Result<Vec<String>, PaletteError> {
        if let Some(colors) = self.state.read().await.as_ref() {
            return Ok(colors.clone());
        }

        let colors = self.read_stored().await?;
        // A concurrent first read may have won; keep its result
        let mut state = self.state.write().await;
        Ok(state.get_or_insert(colors).clone())
    }

    /// Reads and sanitizes the stored list. Invalid or repeated entries are
    /// dropped so a hand-edited file cannot break the invariants.
    async fn read_stored(&self) -> Result<Vec<String>, PaletteError> {
        let stored = self
            .storage
            .get(RECENT_COLORS_KEY)
            .await
            .map_err(|e| PaletteError::persistence(&e))?;

        let Some(value) = stored else {
            debug!("No recent colors stored, using defaults");
            return Ok(default_colors(self.limit));
        };

        let raw: Vec<String> = serde_json::from_value(value).map_err(|e| {
            PaletteError::PersistenceFailure(format!("Stored recent colors are corrupted: {e}"))
        })?;

        let mut colors: Vec<String> = Vec::with_capacity(raw.len().min(self.limit));
        for entry in raw {
            match color::validate_hex(&entry) {
                Ok(hex) if !colors.contains(&hex) => colors.push(hex),
                Ok(_) => {}
                Err(err) => warn!("Dropping stored recent color: {err}"),
            }
        }
        colors.truncate(self.limit);
        debug!(count = colors.len(), "Loaded recent colors");
        Ok(colors)
    }

    async fn commit(&self, next: Vec<String>) -> Result<Vec<String>, PaletteError> {
        let value = Value::from(next.clone());
        if let Err(err) = self.storage.set(RECENT_COLORS_KEY, value).await {
            warn!("Failed to persist recent colors: {err:#}");
            return Err(PaletteError::persistence(&err));
        }

        *self.state.write().await = Some(next.clone());
        self.listeners.notify(&next);
        Ok(next)
    }
}

impl<S> std::fmt::Debug for RecentColorsTracker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentColorsTracker")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

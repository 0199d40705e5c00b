//! Palette collection service.
//!
//! [`PaletteStore`] owns the in-memory palette list and its persisted copy.
//! Every mutation follows the same sequence under the write gate: snapshot,
//! validate, build the next list, persist it, swap it in, notify listeners.
//! A failed persist leaves the in-memory list untouched.

use chrono::Utc;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock as StdRwLock};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::listeners::{Listeners, Subscription};
use crate::color;
use crate::constants::{
    FREE_PALETTE_LIMIT, MAX_COLORS_PER_PALETTE, PALETTES_KEY, PRO_PALETTE_LIMIT,
};
use crate::error::PaletteError;
use crate::models::palette::{normalize_colors, validate_name};
use crate::models::{Palette, PaletteUpdate, Tier};
use crate::storage::{KeyValueStore, StorageBackend};

/// Ceilings enforced by [`PaletteStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteLimits {
    /// Maximum palettes on the free tier
    pub free_palettes: usize,
    /// Maximum palettes on the pro tier
    pub pro_palettes: usize,
    /// Maximum colors in one palette
    pub colors_per_palette: usize,
}

impl PaletteLimits {
    /// Palette ceiling for `tier`.
    #[must_use]
    pub const fn palettes_for(&self, tier: Tier) -> usize {
        match tier {
            Tier::Free => self.free_palettes,
            Tier::Pro => self.pro_palettes,
        }
    }

    /// Copy with the per-palette color cap forced into `1..=MAX_COLORS_PER_PALETTE`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            colors_per_palette: self.colors_per_palette.clamp(1, MAX_COLORS_PER_PALETTE),
            ..self
        }
    }
}

impl Default for PaletteLimits {
    fn default() -> Self {
        Self {
            free_palettes: FREE_PALETTE_LIMIT,
            pro_palettes: PRO_PALETTE_LIMIT,
            colors_per_palette: MAX_COLORS_PER_PALETTE,
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Persisted collection of named palettes with tier-based limits.
pub struct PaletteStore<S = StorageBackend> {
    storage: Arc<S>,
    limits: PaletteLimits,
    tier: StdRwLock<Tier>,
    state: RwLock<Vec<Palette>>,
    write_gate: Mutex<()>,
    listeners: Listeners<Vec<Palette>>,
}

impl<S: KeyValueStore> PaletteStore<S> {
    /// Loads the persisted palettes. A missing key yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the store cannot be read or holds
    /// data that is not a palette list.
    pub async fn load(storage: Arc<S>, limits: PaletteLimits, tier: Tier) -> Result<Self, PaletteError> {
        let palettes = match storage
            .get(PALETTES_KEY)
            .await
            .map_err(|e| PaletteError::persistence(&e))?
        {
            Some(value) => serde_json::from_value::<Vec<Palette>>(value).map_err(|e| {
                PaletteError::PersistenceFailure(format!("Stored palettes are corrupted: {e}"))
            })?,
            None => Vec::new(),
        };

        let clamped = limits.clamped();
        if clamped != limits {
            warn!(
                requested = limits.colors_per_palette,
                applied = clamped.colors_per_palette,
                "Per-palette color cap out of range"
            );
        }

        info!(count = palettes.len(), %tier, "Loaded palettes");
        Ok(Self {
            storage,
            limits: clamped,
            tier: StdRwLock::new(tier),
            state: RwLock::new(palettes),
            write_gate: Mutex::new(()),
            listeners: Listeners::new(),
        })
    }

    /// Snapshot of all palettes in creation order.
    pub async fn list(&self) -> Vec<Palette> {
        self.state.read().await.clone()
    }

    /// Palette with the given id.
    pub async fn get(&self, id: &str) -> Option<Palette> {
        self.state.read().await.iter().find(|p| p.id == id).cloned()
    }

    /// Number of palettes.
    pub async fn count(&self) -> usize {
        self.state.read().await.len()
    }

    /// Current tier.
    pub fn tier(&self) -> Tier {
        *self.tier.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switches the tier. Existing palettes above the new ceiling are kept.
    pub fn set_tier(&self, tier: Tier) {
        *self.tier.write().unwrap_or_else(PoisonError::into_inner) = tier;
        info!(%tier, "Tier changed");
    }

    /// Palette ceiling for the current tier.
    pub fn ceiling(&self) -> usize {
        self.limits.palettes_for(self.tier())
    }

    /// Limits this store enforces.
    pub const fn limits(&self) -> PaletteLimits {
        self.limits
    }

    /// Returns true if another palette fits under the ceiling.
    pub async fn can_create(&self) -> bool {
        self.count().await < self.ceiling()
    }

    /// Creates a palette and appends it to the collection.
    ///
    /// The name is trimmed, colors are normalized, deduplicated and truncated
    /// to the per-palette cap.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad name or empty color list, `InvalidColor` for a
    /// malformed color, `LimitReached` at the ceiling, `PersistenceFailure`
    /// if the write fails.
    pub async fn create(&self, name: &str, colors: &[String]) -> Result<Palette, PaletteError> {
        let _gate = self.write_gate.lock().await;

        let name = validate_name(name)?;
        let colors = normalize_colors(colors, self.limits.colors_per_palette)?;

        let mut next = self.list().await;
        let limit = self.ceiling();
        if next.len() >= limit {
            debug!(limit, "Palette ceiling reached");
            return Err(PaletteError::LimitReached { limit });
        }

        let palette = Palette::new(&name, &colors, self.limits.colors_per_palette, now_ms())?;
        next.push(palette.clone());
        self.commit(next).await?;

        info!(id = %palette.id, name = %palette.name, colors = palette.colors.len(), "Created palette");
        Ok(palette)
    }

    /// Applies a partial update.
    ///
    /// An empty update returns the palette unchanged without writing.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, otherwise the same validation errors as
    /// [`PaletteStore::create`].
    pub async fn update(&self, id: &str, update: PaletteUpdate) -> Result<Palette, PaletteError> {
        let _gate = self.write_gate.lock().await;

        let mut next = self.list().await;
        let index = Self::position(&next, id)?;
        if update.is_empty() {
            return Ok(next[index].clone());
        }

        let name = update.name.as_deref().map(validate_name).transpose()?;
        let colors = update
            .colors
            .as_deref()
            .map(|colors| normalize_colors(colors, self.limits.colors_per_palette))
            .transpose()?;

        let palette = &mut next[index];
        if let Some(name) = name {
            palette.name = name;
        }
        if let Some(colors) = colors {
            palette.colors = colors;
        }
        Self::touch(palette);
        let updated = palette.clone();

        self.commit(next).await?;
        info!(id, "Updated palette");
        Ok(updated)
    }

    /// Renames a palette.
    ///
    /// # Errors
    ///
    /// As [`PaletteStore::update`].
    pub async fn rename(&self, id: &str, name: &str) -> Result<Palette, PaletteError> {
        self.update(id, PaletteUpdate::name(name)).await
    }

    /// Appends a color to a palette.
    ///
    /// # Errors
    ///
    /// `InvalidColor`, `NotFound`, `DuplicateColor` if already present,
    /// `ColorLimitReached` if the palette is full.
    pub async fn add_color(&self, id: &str, color: &str) -> Result<Palette, PaletteError> {
        let hex = color::validate_hex(color)?;
        let _gate = self.write_gate.lock().await;

        let mut next = self.list().await;
        let index = Self::position(&next, id)?;
        let palette = &mut next[index];

        if palette.contains_color(&hex) {
            return Err(PaletteError::DuplicateColor { color: hex });
        }
        let limit = self.limits.colors_per_palette;
        if palette.colors.len() >= limit {
            return Err(PaletteError::ColorLimitReached { limit });
        }

        palette.colors.push(hex);
        Self::touch(palette);
        let updated = palette.clone();

        self.commit(next).await?;
        debug!(id, colors = updated.colors.len(), "Added color to palette");
        Ok(updated)
    }

    /// Removes a color from a palette.
    ///
    /// Removing a color the palette does not hold is a no-op.
    ///
    /// # Errors
    ///
    /// `InvalidColor`, `NotFound`, or `Validation` when it is the last color.
    pub async fn remove_color(&self, id: &str, color: &str) -> Result<Palette, PaletteError> {
        let hex = color::validate_hex(color)?;
        let _gate = self.write_gate.lock().await;

        let mut next = self.list().await;
        let index = Self::position(&next, id)?;
        let palette = &mut next[index];

        let Some(position) = palette
            .colors
            .iter()
            .position(|c| c.eq_ignore_ascii_case(&hex))
        else {
            return Ok(palette.clone());
        };
        if palette.colors.len() == 1 {
            return Err(PaletteError::Validation(
                "Cannot remove the last color of a palette".to_string(),
            ));
        }

        palette.colors.remove(position);
        Self::touch(palette);
        let updated = palette.clone();

        self.commit(next).await?;
        debug!(id, colors = updated.colors.len(), "Removed color from palette");
        Ok(updated)
    }

    /// Deletes a palette and returns it.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `PersistenceFailure` if the write fails.
    pub async fn delete(&self, id: &str) -> Result<Palette, PaletteError> {
        let _gate = self.write_gate.lock().await;

        let mut next = self.list().await;
        let index = Self::position(&next, id)?;
        let removed = next.remove(index);

        self.commit(next).await?;
        info!(id, name = %removed.name, "Deleted palette");
        Ok(removed)
    }

    /// Deletes every palette and the persisted key.
    ///
    /// # Errors
    ///
    /// `PersistenceFailure` if the key cannot be deleted.
    pub async fn clear_all(&self) -> Result<(), PaletteError> {
        let _gate = self.write_gate.lock().await;

        self.storage.delete(PALETTES_KEY).await.map_err(|e| {
            warn!("Failed to clear palettes: {e:#}");
            PaletteError::persistence(&e)
        })?;

        let snapshot = {
            let mut state = self.state.write().await;
            state.clear();
            state.clone()
        };
        self.listeners.notify(&snapshot);
        info!("Cleared all palettes");
        Ok(())
    }

    /// Palettes whose name contains `query`, case-insensitively.
    ///
    /// A blank query matches everything.
    pub async fn search(&self, query: &str) -> Vec<Palette> {
        let query = query.trim();
        let state = self.state.read().await;
        if query.is_empty() {
            return state.clone();
        }
        state
            .iter()
            .filter(|p| p.name_matches(query))
            .cloned()
            .collect()
    }

    /// Palettes containing `hex`, case-insensitively.
    ///
    /// # Errors
    ///
    /// `InvalidColor` for malformed input.
    pub async fn find_by_color(&self, hex: &str) -> Result<Vec<Palette>, PaletteError> {
        let hex = color::validate_hex(hex)?;
        Ok(self
            .state
            .read()
            .await
            .iter()
            .filter(|p| p.contains_color(&hex))
            .cloned()
            .collect())
    }

    /// Registers a callback receiving the full list after each successful mutation.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Vec<Palette>) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    fn position(palettes: &[Palette], id: &str) -> Result<usize, PaletteError> {
        palettes
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PaletteError::NotFound { id: id.to_string() })
    }

    /// Bumps `updated_at`, never moving it backwards.
    fn touch(palette: &mut Palette) {
        palette.updated_at = now_ms().max(palette.updated_at);
    }

    /// Persists `next`, then makes it the visible state and notifies.
    async fn commit(&self, next: Vec<Palette>) -> Result<(), PaletteError> {
        let value: Value = serde_json::to_value(&next).map_err(|e| {
            PaletteError::PersistenceFailure(format!("Failed to serialize palettes: {e}"))
        })?;

        if let Err(err) = self.storage.set(PALETTES_KEY, value).await {
            warn!("Failed to persist palettes: {err:#}");
            return Err(PaletteError::persistence(&err));
        }

        *self.state.write().await = next.clone();
        self.listeners.notify(&next);
        Ok(())
    }
}

impl<S> std::fmt::Debug for PaletteStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteStore")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

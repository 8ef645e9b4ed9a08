//! Snapshot persistence for the wardrobe.
//!
//! The manager restores the four persisted entities once at startup and,
//! after that, writes all of them together whenever the change feed reports
//! that something mutated. Nothing is written before `load` has completed,
//! so empty startup defaults can never overwrite stored state.

use crate::change::{ChangeFeed, Notifier};
use crate::error::{ClosetError, Result};
use crate::item::Item;
use crate::kv::KvStore;
use crate::outfit::{Outfit, OutfitCollection, SavedOutfit};
use crate::store::ItemStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

pub const ITEMS_KEY: &str = "wardrobeItems";
pub const FAVORITES_KEY: &str = "favoriteOutfits";
pub const CUSTOM_KEY: &str = "customOutfits";
pub const DARK_MODE_KEY: &str = "darkMode";
/// Id counters; keeps ids unique across sessions even after deletions.
pub const META_KEY: &str = "wardrobeMeta";
/// Written by early releases, never used. Neither read nor written.
pub const LEGACY_FAVORITES_KEY: &str = "wardrobeFavorites";

// ---------------------------------------------------------------------------
// Stored shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default)]
    pub next_item_id: u64,
    #[serde(default)]
    pub next_favorite_id: u64,
    #[serde(default)]
    pub next_custom_id: u64,
}

/// Saved outfits are either the current tagged record or the bare item
/// array older releases wrote.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredOutfit {
    Saved(SavedOutfit),
    Bare(Outfit),
}

impl From<StoredOutfit> for SavedOutfit {
    fn from(stored: StoredOutfit) -> Self {
        match stored {
            StoredOutfit::Saved(saved) => saved,
            StoredOutfit::Bare(outfit) => SavedOutfit {
                id: Default::default(),
                saved_at: None,
                outfit,
            },
        }
    }
}

/// Everything restored by [`PersistenceManager::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restored {
    pub items: Vec<Item>,
    pub favorites: Vec<SavedOutfit>,
    pub custom: Vec<SavedOutfit>,
    pub dark_mode: bool,
    pub counters: Counters,
}

/// Borrowed view of the live state, written as one snapshot.
pub struct SnapshotView<'a> {
    pub items: &'a ItemStore,
    pub favorites: &'a OutfitCollection,
    pub custom: &'a OutfitCollection,
    pub dark_mode: bool,
}

impl SnapshotView<'_> {
    fn entries(&self) -> Result<Vec<(&'static str, String)>> {
        let counters = Counters {
            next_item_id: self.items.next_id(),
            next_favorite_id: self.favorites.next_id(),
            next_custom_id: self.custom.next_id(),
        };
        Ok(vec![
            (ITEMS_KEY, serde_json::to_string(self.items.list())?),
            (FAVORITES_KEY, serde_json::to_string(self.favorites.list())?),
            (CUSTOM_KEY, serde_json::to_string(self.custom.list())?),
            (DARK_MODE_KEY, serde_json::to_string(&self.dark_mode)?),
            (META_KEY, serde_json::to_string(&counters)?),
        ])
    }
}

// ---------------------------------------------------------------------------
// PersistenceManager
// ---------------------------------------------------------------------------

pub struct PersistenceManager {
    store: Box<dyn KvStore>,
    feed: ChangeFeed,
    loaded: bool,
}

impl PersistenceManager {
    pub fn new(store: impl KvStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            feed: ChangeFeed::new(),
            loaded: false,
        }
    }

    /// Notifier to hand to each entity this manager should observe.
    pub fn notifier(&self) -> Notifier {
        self.feed.notifier()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Read every persisted entity. Missing keys yield defaults; a value
    /// that fails to parse is an error and leaves the manager unloaded, so
    /// it will not overwrite what is on disk.
    pub fn load(&mut self) -> Result<Restored> {
        let items: Vec<Item> = self.read(ITEMS_KEY)?.unwrap_or_default();
        let favorites = self.read_outfits(FAVORITES_KEY)?;
        let custom = self.read_outfits(CUSTOM_KEY)?;
        let dark_mode: bool = self.read(DARK_MODE_KEY)?.unwrap_or(false);
        let counters: Counters = self.read(META_KEY)?.unwrap_or_default();

        // Anything emitted while restoring is not a user change.
        self.feed.drain();
        self.loaded = true;
        tracing::info!(
            items = items.len(),
            favorites = favorites.len(),
            custom = custom.len(),
            dark_mode,
            "wardrobe state restored"
        );
        Ok(Restored {
            items,
            favorites,
            custom,
            dark_mode,
            counters,
        })
    }

    /// Drain pending changes and, if any arrived after load, write one
    /// snapshot of `view`. Returns whether a snapshot was written. A failed
    /// write keeps the changes pending, so the next settle retries it.
    pub fn settle(&mut self, view: SnapshotView<'_>) -> Result<bool> {
        let changes = self.feed.drain();
        if changes.is_empty() {
            return Ok(false);
        }
        if !self.loaded {
            tracing::debug!(?changes, "state not loaded yet, snapshot skipped");
            return Ok(false);
        }
        let written = view
            .entries()
            .and_then(|entries| self.store.put_all(&entries));
        if let Err(e) = written {
            tracing::warn!(?changes, error = %e, "wardrobe snapshot failed");
            self.feed.requeue(changes);
            return Err(e);
        }
        tracing::debug!(?changes, "wardrobe snapshot written");
        Ok(true)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ClosetError::CorruptValue {
                key: key.to_string(),
                source,
            })
    }

    fn read_outfits(&self, key: &str) -> Result<Vec<SavedOutfit>> {
        let stored: Vec<StoredOutfit> = self.read(key)?.unwrap_or_default();
        Ok(stored.into_iter().map(SavedOutfit::from).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

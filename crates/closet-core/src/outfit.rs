use crate::change::{Change, Notifier};
use crate::error::{ClosetError, Result};
use crate::item::Item;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outfit
// ---------------------------------------------------------------------------

/// Ordered group of item values.
///
/// An outfit owns copies of its items; it never tracks later edits to or
/// deletions from the item store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outfit(Vec<Item>);

impl Outfit {
    pub fn new(items: Vec<Item>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Item> for Outfit {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// SavedOutfit
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OutfitId(pub u64);

impl OutfitId {
    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for OutfitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedOutfit {
    #[serde(default)]
    pub id: OutfitId,
    /// Absent on outfits saved before timestamps were recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    pub outfit: Outfit,
}

// ---------------------------------------------------------------------------
// OutfitCollection
// ---------------------------------------------------------------------------

/// Ordered list of saved outfits. Favorites and custom outfits are two
/// independent instances that differ only in the change they emit.
#[derive(Debug, Clone)]
pub struct OutfitCollection {
    outfits: Vec<SavedOutfit>,
    next_id: u64,
    kind: Change,
    notifier: Notifier,
}

impl OutfitCollection {
    pub fn new(kind: Change, notifier: Notifier) -> Self {
        Self {
            outfits: Vec::new(),
            next_id: 1,
            kind,
            notifier,
        }
    }

    pub fn favorites(notifier: Notifier) -> Self {
        Self::new(Change::FavoriteOutfits, notifier)
    }

    pub fn custom(notifier: Notifier) -> Self {
        Self::new(Change::CustomOutfits, notifier)
    }

    /// Rebuild from persisted parts, assigning ids to entries without one.
    /// Fails if a stored id leaves no room for another.
    pub fn restore(
        outfits: Vec<SavedOutfit>,
        next_id: u64,
        kind: Change,
        notifier: Notifier,
    ) -> Result<Self> {
        let highest = outfits.iter().map(|o| o.id.0).max().unwrap_or(0);
        let above = highest
            .checked_add(1)
            .ok_or(ClosetError::IdOverflow(counter_name(kind)))?;
        let mut collection = Self {
            outfits,
            next_id: next_id.max(above),
            kind,
            notifier,
        };
        for idx in 0..collection.outfits.len() {
            if !collection.outfits[idx].id.is_assigned() {
                collection.outfits[idx].id = collection.allocate()?;
            }
        }
        Ok(collection)
    }

    fn allocate(&mut self) -> Result<OutfitId> {
        let id = OutfitId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(ClosetError::IdOverflow(counter_name(self.kind)))?;
        Ok(id)
    }

    /// Save `outfit` under a new id. Nothing changes when the id counter is
    /// exhausted.
    pub fn append(&mut self, outfit: Outfit) -> Result<OutfitId> {
        let id = self.allocate()?;
        self.outfits.push(SavedOutfit {
            id,
            saved_at: Some(Utc::now()),
            outfit,
        });
        self.notifier.emit(self.kind);
        Ok(id)
    }

    /// Remove the entry at `index`; no-op when out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<SavedOutfit> {
        if index >= self.outfits.len() {
            return None;
        }
        let removed = self.outfits.remove(index);
        self.notifier.emit(self.kind);
        Some(removed)
    }

    pub fn remove(&mut self, id: OutfitId) -> Option<SavedOutfit> {
        let index = self.outfits.iter().position(|o| o.id == id)?;
        self.remove_at(index)
    }

    pub fn list(&self) -> &[SavedOutfit] {
        &self.outfits
    }

    pub fn get_at(&self, index: usize) -> Option<&SavedOutfit> {
        self.outfits.get(index)
    }

    pub fn len(&self) -> usize {
        self.outfits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

fn counter_name(kind: Change) -> &'static str {
    match kind {
        Change::CustomOutfits => "custom outfit",
        _ => "favorite outfit",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeFeed;
    use crate::item::Category;

    fn outfit(names: &[&str]) -> Outfit {
        names
            .iter()
            .map(|n| Item::new(*n, Category::Top, "Black"))
            .collect()
    }

    #[test]
    fn append_and_remove_at_shift_entries() {
        let mut favs = OutfitCollection::favorites(Notifier::detached());
        favs.append(outfit(&["a"])).unwrap();
        favs.append(outfit(&["b"])).unwrap();
        favs.append(outfit(&["c"])).unwrap();

        let removed = favs.remove_at(0).unwrap();
        assert_eq!(removed.outfit.items()[0].name, "a");
        assert_eq!(favs.get_at(0).unwrap().outfit.items()[0].name, "b");
        assert_eq!(favs.len(), 2);
        assert!(favs.remove_at(2).is_none());
    }

    #[test]
    fn collections_emit_their_own_change_kind() {
        let feed = ChangeFeed::new();
        let mut favs = OutfitCollection::favorites(feed.notifier());
        let mut custom = OutfitCollection::custom(feed.notifier());

        favs.append(outfit(&["a"])).unwrap();
        assert_eq!(
            feed.drain().into_iter().collect::<Vec<_>>(),
            [Change::FavoriteOutfits]
        );

        custom.append(outfit(&["a", "b"])).unwrap();
        custom.remove_at(7);
        assert_eq!(
            feed.drain().into_iter().collect::<Vec<_>>(),
            [Change::CustomOutfits]
        );
    }

    #[test]
    fn remove_by_id_ignores_unknown_ids() {
        let mut custom = OutfitCollection::custom(Notifier::detached());
        let id = custom.append(outfit(&["a", "b"])).unwrap();
        assert!(custom.remove(OutfitId(42)).is_none());
        assert_eq!(custom.remove(id).unwrap().id, id);
        assert!(custom.is_empty());
    }

    #[test]
    fn legacy_outfits_get_ids_on_restore() {
        let legacy = SavedOutfit {
            id: OutfitId::default(),
            saved_at: None,
            outfit: outfit(&["x"]),
        };
        let mut favs =
            OutfitCollection::restore(vec![legacy], 1, Change::FavoriteOutfits, Notifier::detached())
                .unwrap();
        assert_eq!(favs.get_at(0).unwrap().id, OutfitId(1));
        assert_eq!(favs.append(outfit(&["y"])).unwrap(), OutfitId(2));
    }

    #[test]
    fn exhausted_counters_are_errors_not_panics() {
        let stored = SavedOutfit {
            id: OutfitId(u64::MAX),
            saved_at: None,
            outfit: outfit(&["x"]),
        };
        let err = OutfitCollection::restore(
            vec![stored],
            1,
            Change::CustomOutfits,
            Notifier::detached(),
        )
        .unwrap_err();
        assert!(matches!(err, ClosetError::IdOverflow("custom outfit")));

        let mut favs = OutfitCollection::restore(
            Vec::new(),
            u64::MAX,
            Change::FavoriteOutfits,
            Notifier::detached(),
        )
        .unwrap();
        assert!(favs.append(outfit(&["y"])).is_err());
        assert!(favs.is_empty());
    }
}

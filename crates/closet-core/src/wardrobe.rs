//! The wardrobe aggregate: every piece of user state plus its persistence.
//!
//! Each public mutation is one complete user action. It updates the
//! affected entities, which report their changes on the change feed, and
//! then settles, writing a single snapshot if anything actually changed.

use rand::Rng;

use crate::change::Change;
use crate::composer;
use crate::error::{ClosetError, Result};
use crate::filter::Filter;
use crate::item::{Item, ItemId};
use crate::kv::KvStore;
use crate::outfit::{Outfit, OutfitCollection, OutfitId, SavedOutfit};
use crate::persist::{PersistenceManager, SnapshotView};
use crate::prefs::Preferences;
use crate::selection::SelectionSet;
use crate::store::ItemStore;

/// Smallest number of selected items that makes a custom outfit.
pub const MIN_CUSTOM_OUTFIT_ITEMS: usize = 2;

pub struct Wardrobe {
    items: ItemStore,
    favorites: OutfitCollection,
    custom: OutfitCollection,
    preferences: Preferences,
    selection: SelectionSet,
    persistence: PersistenceManager,
}

impl Wardrobe {
    /// Restore the wardrobe from `store`. Until this returns, nothing is
    /// written back.
    pub fn open(store: impl KvStore + 'static) -> Result<Self> {
        let mut persistence = PersistenceManager::new(store);
        let restored = persistence.load()?;
        let counters = restored.counters;

        Ok(Self {
            items: ItemStore::restore(
                restored.items,
                counters.next_item_id,
                persistence.notifier(),
            )?,
            favorites: OutfitCollection::restore(
                restored.favorites,
                counters.next_favorite_id,
                Change::FavoriteOutfits,
                persistence.notifier(),
            )?,
            custom: OutfitCollection::restore(
                restored.custom,
                counters.next_custom_id,
                Change::CustomOutfits,
                persistence.notifier(),
            )?,
            preferences: Preferences::new(restored.dark_mode, persistence.notifier()),
            selection: SelectionSet::new(),
            persistence,
        })
    }

    // ---------------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------------

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    pub fn favorites(&self) -> &OutfitCollection {
        &self.favorites
    }

    pub fn custom_outfits(&self) -> &OutfitCollection {
        &self.custom
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn dark_mode(&self) -> bool {
        self.preferences.dark_mode()
    }

    /// Items passing `filter`, with their store positions.
    pub fn filtered<'a>(&'a self, filter: &'a Filter) -> Vec<(usize, &'a Item)> {
        filter.apply(self.items.list()).collect()
    }

    /// Items passing the attribute constraints of `filter`, ignoring its
    /// search term.
    pub fn candidate_pool(&self, filter: &Filter) -> Vec<&Item> {
        let pool = filter.attributes_only();
        self.items
            .list()
            .iter()
            .filter(|item| pool.matches(item))
            .collect()
    }

    /// Compose a random outfit from the candidate pool. Read-only: the
    /// result is only kept if the caller saves it.
    pub fn suggest_outfit<R>(&self, filter: &Filter, rng: &mut R) -> Result<Outfit>
    where
        R: Rng + ?Sized,
    {
        composer::suggest(&self.candidate_pool(filter), rng)
    }

    /// Selected items in selection order.
    pub fn selected_items(&self) -> Vec<&Item> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.items.get(*id))
            .collect()
    }

    // ---------------------------------------------------------------------------
    // Item mutations
    // ---------------------------------------------------------------------------

    pub fn add_item(&mut self, item: Item) -> Result<ItemId> {
        let id = self.items.add(item)?;
        self.settle()?;
        Ok(id)
    }

    /// Remove the item at `index`; out-of-range indexes are a no-op.
    /// Saved outfits keep their copy of the item; the selection drops it.
    pub fn remove_item_at(&mut self, index: usize) -> Result<Option<Item>> {
        let removed = self.items.remove_at(index);
        if let Some(item) = &removed {
            self.selection.prune(item.id);
        }
        self.settle()?;
        Ok(removed)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<Option<Item>> {
        match self.items.position(id) {
            Some(index) => self.remove_item_at(index),
            None => Ok(None),
        }
    }

    // ---------------------------------------------------------------------------
    // Favorites
    // ---------------------------------------------------------------------------

    /// Save a snapshot of `outfit`. An empty outfit is ignored.
    pub fn save_favorite(&mut self, outfit: &Outfit) -> Result<Option<OutfitId>> {
        if outfit.is_empty() {
            return Ok(None);
        }
        let id = self.favorites.append(outfit.clone())?;
        self.settle()?;
        Ok(Some(id))
    }

    pub fn remove_favorite_at(&mut self, index: usize) -> Result<Option<SavedOutfit>> {
        let removed = self.favorites.remove_at(index);
        self.settle()?;
        Ok(removed)
    }

    // ---------------------------------------------------------------------------
    // Selection and custom outfits
    // ---------------------------------------------------------------------------

    /// Toggle `id` in the selection. Returns `None` if no such item exists,
    /// otherwise whether it is now selected.
    pub fn toggle_selection(&mut self, id: ItemId) -> Option<bool> {
        self.items.get(id)?;
        Some(self.selection.toggle(id))
    }

    /// Toggle the item currently at `index`.
    pub fn toggle_selection_at(&mut self, index: usize) -> Option<bool> {
        let id = self.items.get_at(index)?.id;
        Some(self.selection.toggle(id))
    }

    /// Build a custom outfit from the selected items in selection order and
    /// clear the selection. Fewer than [`MIN_CUSTOM_OUTFIT_ITEMS`] selected
    /// items is an error and changes nothing.
    pub fn create_custom_outfit(&mut self) -> Result<OutfitId> {
        let outfit: Outfit = self.selected_items().into_iter().cloned().collect();
        if outfit.len() < MIN_CUSTOM_OUTFIT_ITEMS {
            return Err(ClosetError::NotEnoughSelections {
                needed: MIN_CUSTOM_OUTFIT_ITEMS,
                got: outfit.len(),
            });
        }
        let id = self.custom.append(outfit)?;
        self.selection.clear();
        self.settle()?;
        Ok(id)
    }

    pub fn remove_custom_at(&mut self, index: usize) -> Result<Option<SavedOutfit>> {
        let removed = self.custom.remove_at(index);
        self.settle()?;
        Ok(removed)
    }

    // ---------------------------------------------------------------------------
    // Preferences
    // ---------------------------------------------------------------------------

    pub fn set_dark_mode(&mut self, on: bool) -> Result<()> {
        self.preferences.set_dark_mode(on);
        self.settle()?;
        Ok(())
    }

    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        let on = self.preferences.toggle_dark_mode();
        self.settle()?;
        Ok(on)
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Write a snapshot if anything changed since the last settle.
    pub fn settle(&mut self) -> Result<bool> {
        self.persistence.settle(SnapshotView {
            items: &self.items,
            favorites: &self.favorites,
            custom: &self.custom,
            dark_mode: self.preferences.dark_mode(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Category;
    use crate::kv::{MemoryStore, RedbStore};
    use crate::persist::{ITEMS_KEY, META_KEY};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn item(name: &str, category: Category) -> Item {
        Item::new(name, category, "Black")
    }

    fn open() -> (MemoryStore, Wardrobe) {
        let kv = MemoryStore::new();
        let wardrobe = Wardrobe::open(kv.clone()).unwrap();
        (kv, wardrobe)
    }

    #[test]
    fn added_item_appears_once_under_empty_filter() {
        let (_kv, mut w) = open();
        let id = w.add_item(item("Tee", Category::Top)).unwrap();
        let filter = Filter::default();
        let hits: Vec<_> = w
            .filtered(&filter)
            .into_iter()
            .filter(|(_, i)| i.id == id)
            .collect();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn every_mutation_writes_one_snapshot() {
        let (kv, mut w) = open();
        assert_eq!(kv.write_count(), 0);
        w.add_item(item("Tee", Category::Top)).unwrap();
        assert_eq!(kv.write_count(), 1);
        w.toggle_dark_mode().unwrap();
        assert_eq!(kv.write_count(), 2);
        // No-ops stay quiet.
        w.remove_item_at(9).unwrap();
        w.remove_favorite_at(0).unwrap();
        w.set_dark_mode(true).unwrap();
        assert_eq!(kv.write_count(), 2);
    }

    #[test]
    fn favorite_is_isolated_from_item_deletion() {
        let (_kv, mut w) = open();
        w.add_item(item("Oxford", Category::Shirt)).unwrap();
        w.add_item(item("Chinos", Category::Trousers)).unwrap();

        let outfit = w
            .suggest_outfit(&Filter::default(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        w.save_favorite(&outfit).unwrap();
        let before = w.favorites().get_at(0).unwrap().outfit.clone();

        w.remove_item_at(0).unwrap();
        assert_eq!(w.items().len(), 1);
        assert_eq!(w.favorites().get_at(0).unwrap().outfit, before);
        assert_eq!(before.items()[0].name, "Oxford");
    }

    #[test]
    fn empty_suggestion_is_reported_and_not_saved() {
        let (_kv, mut w) = open();
        w.add_item(item("Scarf", Category::Accessories)).unwrap();
        let err = w
            .suggest_outfit(&Filter::default(), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, ClosetError::NoMatchingItems));
        assert_eq!(w.save_favorite(&Outfit::default()).unwrap(), None);
        assert!(w.favorites().is_empty());
    }

    #[test]
    fn pool_ignores_search_term() {
        let (_kv, mut w) = open();
        w.add_item(item("Oxford", Category::Shirt)).unwrap();
        let filter = Filter::search("no such name");
        assert!(w.filtered(&filter).is_empty());
        assert_eq!(w.candidate_pool(&filter).len(), 1);
    }

    #[test]
    fn custom_outfit_uses_selection_order() {
        let (_kv, mut w) = open();
        for name in ["A", "B", "C"] {
            w.add_item(item(name, Category::Top)).unwrap();
        }
        w.toggle_selection_at(2).unwrap();
        w.toggle_selection_at(0).unwrap();
        w.create_custom_outfit().unwrap();

        let saved = w.custom_outfits().get_at(0).unwrap();
        let names: Vec<_> = saved.outfit.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["C", "A"]);
        assert!(w.selection().is_empty());
    }

    #[test]
    fn custom_outfit_needs_two_selections() {
        let (kv, mut w) = open();
        w.add_item(item("A", Category::Top)).unwrap();
        w.toggle_selection_at(0).unwrap();
        let writes = kv.write_count();

        let err = w.create_custom_outfit().unwrap_err();
        assert!(matches!(
            err,
            ClosetError::NotEnoughSelections { needed: 2, got: 1 }
        ));
        assert!(w.custom_outfits().is_empty());
        assert_eq!(w.selection().len(), 1);
        assert_eq!(kv.write_count(), writes);
    }

    #[test]
    fn deleting_an_item_prunes_it_from_the_selection() {
        let (_kv, mut w) = open();
        for name in ["A", "B", "C"] {
            w.add_item(item(name, Category::Top)).unwrap();
        }
        w.toggle_selection_at(0).unwrap();
        w.toggle_selection_at(2).unwrap();
        w.remove_item_at(0).unwrap();

        // "C" is now at index 1 but the selection still means "C".
        let names: Vec<_> = w.selected_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["C"]);
        assert_eq!(w.toggle_selection_at(5), None);
    }

    #[test]
    fn remove_item_by_id_prunes_the_selection() {
        let (kv, mut w) = open();
        let a = w.add_item(item("A", Category::Top)).unwrap();
        let b = w.add_item(item("B", Category::Trousers)).unwrap();
        assert_eq!(w.toggle_selection(a), Some(true));
        assert_eq!(w.toggle_selection(b), Some(true));
        let writes = kv.write_count();

        let removed = w.remove_item(a).unwrap().unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(w.selection().ids(), [b]);
        assert_eq!(kv.write_count(), writes + 1);

        assert_eq!(w.remove_item(a).unwrap(), None);
        assert_eq!(kv.write_count(), writes + 1);
    }

    #[test]
    fn toggle_selection_by_id() {
        let (kv, mut w) = open();
        let a = w.add_item(item("A", Category::Top)).unwrap();
        let writes = kv.write_count();

        assert_eq!(w.toggle_selection(a), Some(true));
        assert_eq!(w.toggle_selection(a), Some(false));
        assert!(w.selection().is_empty());
        assert_eq!(w.toggle_selection(ItemId(99)), None);
        assert!(w.selection().is_empty());
        // Selection is session state and never persisted.
        assert_eq!(kv.write_count(), writes);
    }

    #[test]
    fn stored_id_at_the_limit_fails_open() {
        let kv = MemoryStore::new();
        kv.insert(
            ITEMS_KEY,
            r#"[{"id":18446744073709551615,"name":"Tee","category":"Top","color":"Black"}]"#,
        );
        let err = Wardrobe::open(kv.clone()).err().unwrap();
        assert!(matches!(err, ClosetError::IdOverflow("item")));
        assert_eq!(kv.write_count(), 0);
    }

    #[test]
    fn exhausted_item_counter_fails_add_without_writing() {
        let kv = MemoryStore::new();
        kv.insert(META_KEY, r#"{"next_item_id":18446744073709551615}"#);
        let mut w = Wardrobe::open(kv.clone()).unwrap();

        let err = w.add_item(item("Tee", Category::Top)).unwrap_err();
        assert!(matches!(err, ClosetError::IdOverflow("item")));
        assert!(w.items().is_empty());
        assert_eq!(kv.write_count(), 0);
    }

    #[test]
    fn state_round_trips_through_redb() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wardrobe.redb");
        let (items, favorites, custom) = {
            let mut w = Wardrobe::open(RedbStore::open(&path).unwrap()).unwrap();
            w.add_item(item("Hoodie", Category::Hoodie).with_season("Winter"))
                .unwrap();
            w.add_item(item("Jeans", Category::Trousers).with_image("file:///x.png"))
                .unwrap();
            w.add_item(item("Boots", Category::Shoes)).unwrap();
            let outfit = w
                .suggest_outfit(&Filter::default(), &mut StdRng::seed_from_u64(9))
                .unwrap();
            w.save_favorite(&outfit).unwrap();
            w.toggle_selection_at(1).unwrap();
            w.toggle_selection_at(2).unwrap();
            w.create_custom_outfit().unwrap();
            w.remove_item_at(0).unwrap();
            w.set_dark_mode(true).unwrap();
            (
                w.items().list().to_vec(),
                w.favorites().list().to_vec(),
                w.custom_outfits().list().to_vec(),
            )
        };

        let mut w = Wardrobe::open(RedbStore::open(&path).unwrap()).unwrap();
        assert_eq!(w.items().list(), items.as_slice());
        assert_eq!(w.favorites().list(), favorites.as_slice());
        assert_eq!(w.custom_outfits().list(), custom.as_slice());
        assert!(w.dark_mode());

        // Ids keep counting from where the last session stopped.
        let next = w.add_item(item("Cap", Category::Accessories)).unwrap();
        assert!(items.iter().all(|i| i.id < next));
    }

    #[test]
    fn dark_mode_toggled_twice_persists_original_value() {
        let (kv, mut w) = open();
        let original = w.dark_mode();
        w.toggle_dark_mode().unwrap();
        w.toggle_dark_mode().unwrap();
        assert_eq!(w.dark_mode(), original);
        assert_eq!(
            kv.get(crate::persist::DARK_MODE_KEY).unwrap().as_deref(),
            Some("false")
        );
    }
}

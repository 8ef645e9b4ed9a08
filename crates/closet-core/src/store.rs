use crate::change::{Change, Notifier};
use crate::error::{ClosetError, Result};
use crate::item::{Item, ItemId};

/// Ordered collection of wardrobe items.
///
/// Items are keyed by a stable [`ItemId`]; the position of an item is a
/// derived lookup that shifts as earlier items are removed.
#[derive(Debug, Clone)]
pub struct ItemStore {
    items: Vec<Item>,
    next_id: u64,
    notifier: Notifier,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new(Notifier::detached())
    }
}

impl ItemStore {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            notifier,
        }
    }

    /// Rebuild a store from persisted parts.
    ///
    /// Items without an id get one in stored order, and the counter is
    /// raised past every id in use so future ids never collide. Fails if a
    /// stored id leaves no room for another.
    pub fn restore(items: Vec<Item>, next_id: u64, notifier: Notifier) -> Result<Self> {
        let highest = items.iter().map(|i| i.id.0).max().unwrap_or(0);
        let above = highest
            .checked_add(1)
            .ok_or(ClosetError::IdOverflow("item"))?;
        let mut store = Self {
            items,
            next_id: next_id.max(above),
            notifier,
        };
        for idx in 0..store.items.len() {
            if !store.items[idx].id.is_assigned() {
                store.items[idx].id = store.allocate()?;
            }
        }
        Ok(store)
    }

    fn allocate(&mut self) -> Result<ItemId> {
        let id = ItemId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(ClosetError::IdOverflow("item"))?;
        Ok(id)
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    /// Append `item` and return its newly assigned id. Duplicates are allowed.
    /// Nothing changes when the id counter is exhausted.
    pub fn add(&mut self, mut item: Item) -> Result<ItemId> {
        let id = self.allocate()?;
        item.id = id;
        self.items.push(item);
        self.notifier.emit(Change::Items);
        Ok(id)
    }

    /// Remove the item at `index`; later items shift down by one.
    /// Out-of-range indexes are a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<Item> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.notifier.emit(Change::Items);
        Some(removed)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.position(id)?;
        self.remove_at(index)
    }

    // ---------------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------------

    pub fn list(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_at(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
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

    fn item(name: &str) -> Item {
        Item::new(name, Category::Shirt, "Blue")
    }

    #[test]
    fn add_assigns_increasing_ids_and_allows_duplicates() {
        let mut store = ItemStore::default();
        let a = store.add(item("Tee")).unwrap();
        let b = store.add(item("Tee")).unwrap();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b).unwrap().name, "Tee");
    }

    #[test]
    fn remove_at_shifts_later_items_down() {
        let mut store = ItemStore::default();
        for name in ["A", "B", "C", "D"] {
            store.add(item(name)).unwrap();
        }
        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.name, "B");
        let names: Vec<_> = store.list().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["A", "C", "D"]);
    }

    #[test]
    fn remove_out_of_range_is_noop_without_event() {
        let feed = ChangeFeed::new();
        let mut store = ItemStore::new(feed.notifier());
        store.add(item("A")).unwrap();
        feed.drain();

        assert!(store.remove_at(5).is_none());
        assert!(store.remove(ItemId(99)).is_none());
        assert_eq!(store.len(), 1);
        assert!(feed.drain().is_empty());
    }

    #[test]
    fn ids_survive_position_shifts() {
        let mut store = ItemStore::default();
        let a = store.add(item("A")).unwrap();
        let c = {
            store.add(item("B")).unwrap();
            store.add(item("C")).unwrap()
        };
        store.remove_at(0);
        assert_eq!(store.position(c), Some(1));
        assert_eq!(store.position(a), None);
    }

    #[test]
    fn restore_assigns_missing_ids_and_raises_counter() {
        let mut kept = item("Kept");
        kept.id = ItemId(7);
        let legacy = item("Legacy");
        let mut store = ItemStore::restore(vec![kept, legacy], 3, Notifier::detached()).unwrap();

        assert_eq!(store.get_at(0).unwrap().id, ItemId(7));
        assert_eq!(store.get_at(1).unwrap().id, ItemId(8));
        assert_eq!(store.add(item("New")).unwrap(), ItemId(9));
    }

    #[test]
    fn mutations_emit_item_changes() {
        let feed = ChangeFeed::new();
        let mut store = ItemStore::new(feed.notifier());
        store.add(item("A")).unwrap();
        store.remove_at(0);
        let changes = feed.drain();
        assert_eq!(changes.into_iter().collect::<Vec<_>>(), [Change::Items]);
    }

    #[test]
    fn restore_rejects_ids_at_the_counter_limit() {
        let mut top = item("Top");
        top.id = ItemId(u64::MAX);
        let err = ItemStore::restore(vec![top], 1, Notifier::detached()).unwrap_err();
        assert!(matches!(err, ClosetError::IdOverflow("item")));
    }

    #[test]
    fn exhausted_counter_fails_add_without_mutating() {
        let feed = ChangeFeed::new();
        let mut store = ItemStore::restore(Vec::new(), u64::MAX, feed.notifier()).unwrap();
        let err = store.add(item("A")).unwrap_err();
        assert!(matches!(err, ClosetError::IdOverflow("item")));
        assert!(store.is_empty());
        assert_eq!(store.next_id(), u64::MAX);
        assert!(feed.drain().is_empty());
    }
}

use crate::item::ItemId;

/// Items picked for a custom outfit, in the order they were picked.
///
/// Holds ids rather than positions so deleting another item can never make
/// an entry point at the wrong garment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`, or deselect it if already selected. Returns whether the
    /// id is selected afterwards.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Drop `id`, used when its item leaves the store.
    pub fn prune(&mut self, id: ItemId) {
        self.ids.retain(|s| *s != id);
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

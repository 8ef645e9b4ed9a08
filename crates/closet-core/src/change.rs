//! Change notifications from the mutable wardrobe entities.
//!
//! Each entity holds a [`Notifier`] and emits a [`Change`] after it has
//! actually mutated. The persistence manager owns the matching
//! [`ChangeFeed`] and drains it once the current user action has settled,
//! so a snapshot never observes a half-applied mutation.

use std::collections::BTreeSet;
use std::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Change {
    Items,
    FavoriteOutfits,
    CustomOutfits,
    Preferences,
}

/// Sending half handed to each entity. A detached notifier drops events.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    tx: Option<mpsc::Sender<Change>>,
}

impl Notifier {
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub(crate) fn emit(&self, change: Change) {
        if let Some(tx) = &self.tx {
            // The feed outlives every entity in a Wardrobe; a closed
            // channel only happens for entities used standalone.
            if tx.send(change).is_err() {
                tracing::trace!(?change, "change feed closed, event dropped");
            }
        }
    }
}

/// Receiving half of the change channel.
#[derive(Debug)]
pub struct ChangeFeed {
    tx: mpsc::Sender<Change>,
    rx: mpsc::Receiver<Change>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn notifier(&self) -> Notifier {
        Notifier {
            tx: Some(self.tx.clone()),
        }
    }

    /// Take every pending event, coalesced. Empty when nothing changed.
    pub fn drain(&self) -> BTreeSet<Change> {
        self.rx.try_iter().collect()
    }

    /// Put drained events back so the next drain reports them again.
    pub(crate) fn requeue(&self, changes: BTreeSet<Change>) {
        for change in changes {
            // Both halves live in `self`, so the channel is open.
            let _ = self.tx.send(change);
        }
    }
}

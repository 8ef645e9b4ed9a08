pub mod change;
pub mod composer;
pub mod config;
pub mod error;
pub mod filter;
pub mod io;
pub mod item;
pub mod kv;
pub mod outfit;
pub mod paths;
pub mod persist;
pub mod prefs;
pub mod selection;
pub mod store;
pub mod upload;
pub mod wardrobe;

pub use error::{ClosetError, Result};
pub use filter::Filter;
pub use item::{Category, Item, ItemDraft, ItemId};
pub use outfit::{Outfit, OutfitId, SavedOutfit};
pub use wardrobe::Wardrobe;

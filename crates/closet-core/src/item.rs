use crate::error::{ClosetError, Result};
use crate::upload::ImageUpload;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Suggested values
// ---------------------------------------------------------------------------

/// Colors offered at capture time. Stored colors are free text.
pub const SUGGESTED_COLORS: &[&str] = &[
    "Black", "White", "Grey", "Red", "Blue", "Yellow", "Green", "Pink", "Purple", "Brown",
    "Beige", "Orange", "Navy", "Teal",
];

pub const SUGGESTED_OCCASIONS: &[&str] = &[
    "Casual",
    "Formal",
    "Work",
    "Party",
    "Sport",
    "Holiday",
    "Date",
    "Night-Out",
    "Interview",
    "Wedding",
];

pub const SUGGESTED_SEASONS: &[&str] = &["Spring", "Summer", "Autumn", "Winter"];

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Top,
    Shirt,
    Hoodie,
    Jacket,
    Trousers,
    Shoes,
    Skirt,
    Dress,
    Accessories,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Top,
            Category::Shirt,
            Category::Hoodie,
            Category::Jacket,
            Category::Trousers,
            Category::Shoes,
            Category::Skirt,
            Category::Dress,
            Category::Accessories,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Top => "Top",
            Category::Shirt => "Shirt",
            Category::Hoodie => "Hoodie",
            Category::Jacket => "Jacket",
            Category::Trousers => "Trousers",
            Category::Shoes => "Shoes",
            Category::Skirt => "Skirt",
            Category::Dress => "Dress",
            Category::Accessories => "Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"shoes"`, `"Shoes"` and `"SHOES"` all parse.
impl std::str::FromStr for Category {
    type Err = ClosetError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ClosetError::InvalidCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = ClosetError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// ItemId
// ---------------------------------------------------------------------------

/// Stable identifier assigned by the item store when an item is added.
///
/// `ItemId(0)` marks an item that has not been stored yet, which is also
/// what records written before ids existed deserialize to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    pub const UNASSIGNED: ItemId = ItemId(0);

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub color: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub occasion: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub season: Option<String>,
    /// Opaque URL handed back by the blob store.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, category: Category, color: impl Into<String>) -> Self {
        Self {
            id: ItemId::UNASSIGNED,
            name: name.into(),
            category,
            color: color.into(),
            occasion: None,
            season: None,
            image: None,
        }
    }

    pub fn with_occasion(mut self, occasion: impl Into<String>) -> Self {
        self.occasion = non_blank(occasion.into());
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = non_blank(season.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = non_blank(url.into());
        self
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Older snapshots store unset optional fields as `""`.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(non_blank))
}

// ---------------------------------------------------------------------------
// ItemDraft
// ---------------------------------------------------------------------------

/// Raw capture-form fields. `build` validates them into an [`Item`] and
/// leaves the draft untouched on failure so it can be corrected.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub name: String,
    pub category: String,
    pub color: String,
    pub occasion: String,
    pub season: String,
    pub image: ImageUpload,
}

impl ItemDraft {
    pub fn build(&self) -> Result<Item> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClosetError::MissingField("name"));
        }
        if self.category.trim().is_empty() {
            return Err(ClosetError::MissingField("category"));
        }
        let category: Category = self.category.parse()?;
        let color = self.color.trim();
        if color.is_empty() {
            return Err(ClosetError::MissingField("color"));
        }
        if self.image.is_uploading() {
            return Err(ClosetError::UploadInProgress);
        }

        let mut item = Item::new(name, category, color)
            .with_occasion(self.occasion.trim())
            .with_season(self.season.trim());
        item.image = self.image.url().map(str::to_string);
        Ok(item)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

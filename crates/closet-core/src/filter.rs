use crate::item::Item;
use serde::{Deserialize, Serialize};

/// Search term plus attribute constraints. Empty fields constrain nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub occasion: String,
    #[serde(default)]
    pub season: String,
}

impl Filter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_occasion(mut self, occasion: impl Into<String>) -> Self {
        self.occasion = occasion.into();
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = season.into();
        self
    }

    /// The same attribute constraints with the search term dropped; this is
    /// what selects the composer's candidate pool.
    pub fn attributes_only(&self) -> Self {
        Self {
            search: String::new(),
            ..self.clone()
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        matches(item, &self.search, &self.color, &self.occasion, &self.season)
    }

    /// Matching items paired with their position in `items`.
    pub fn apply<'a>(&'a self, items: &'a [Item]) -> impl Iterator<Item = (usize, &'a Item)> + 'a {
        items
            .iter()
            .enumerate()
            .filter(move |(_, item)| self.matches(item))
    }
}

/// Conjunction of:
/// - `search_term` contained (case-insensitively) in the item's name or category
/// - each non-empty attribute filter equal (case-insensitively) to the item's field
///
/// An item with no occasion or season never satisfies a non-empty filter on it.
pub fn matches(item: &Item, search_term: &str, color: &str, occasion: &str, season: &str) -> bool {
    matches_search(item, search_term)
        && field_matches(Some(&item.color), color)
        && field_matches(item.occasion.as_ref(), occasion)
        && field_matches(item.season.as_ref(), season)
}

fn matches_search(item: &Item, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    item.name.to_lowercase().contains(&needle)
        || item.category.as_str().to_lowercase().contains(&needle)
}

fn field_matches(value: Option<&String>, wanted: &str) -> bool {
    if wanted.is_empty() {
        return true;
    }
    value.is_some_and(|v| v.to_lowercase() == wanted.to_lowercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Category;

    fn wardrobe() -> Vec<Item> {
        vec![
            Item::new("Grey hoodie", Category::Hoodie, "Grey")
                .with_occasion("Casual")
                .with_season("Winter"),
            Item::new("Linen shirt", Category::Shirt, "White")
                .with_occasion("Work")
                .with_season("Summer"),
            Item::new("Chelsea boots", Category::Shoes, "Brown"),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let items = wardrobe();
        assert_eq!(Filter::default().apply(&items).count(), items.len());
    }

    #[test]
    fn search_checks_name_and_category() {
        let items = wardrobe();
        let by_name: Vec<_> = Filter::search("LINEN").apply(&items).map(|(i, _)| i).collect();
        assert_eq!(by_name, [1]);

        let by_category: Vec<_> = Filter::search("sho").apply(&items).map(|(i, _)| i).collect();
        assert_eq!(by_category, [2]);
    }

    #[test]
    fn attribute_filters_are_exact_and_conjunctive() {
        let items = wardrobe();
        let f = Filter::default().with_color("white").with_season("summer");
        assert!(f.matches(&items[1]));
        assert!(!f.matches(&items[0]));

        // Substrings don't count for attribute filters.
        assert!(!Filter::default().with_color("whi").matches(&items[1]));
    }

    #[test]
    fn missing_optional_field_fails_a_set_filter() {
        let items = wardrobe();
        assert!(!Filter::default().with_occasion("casual").matches(&items[2]));
        assert!(Filter::default().matches(&items[2]));
    }

    #[test]
    fn casing_of_filter_values_never_changes_the_result() {
        let items = wardrobe();
        for item in &items {
            for (color, occasion, season) in [
                ("Grey", "Casual", "Winter"),
                ("White", "Work", "Summer"),
                ("Brown", "", ""),
            ] {
                let exact = matches(item, "", color, occasion, season);
                let upper = matches(
                    item,
                    "",
                    &color.to_uppercase(),
                    &occasion.to_uppercase(),
                    &season.to_uppercase(),
                );
                let lower = matches(
                    item,
                    "",
                    &color.to_lowercase(),
                    &occasion.to_lowercase(),
                    &season.to_lowercase(),
                );
                assert_eq!(exact, upper);
                assert_eq!(exact, lower);
            }
        }
    }

    #[test]
    fn attributes_only_drops_search() {
        let f = Filter::search("boots").with_color("brown");
        let pool = f.attributes_only();
        assert!(pool.search.is_empty());
        assert_eq!(pool.color, "brown");
    }
}

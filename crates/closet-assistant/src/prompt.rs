use closet_core::Item;

// ─── Inventory prompt ─────────────────────────────────────────────────────

/// One bullet line per item:
/// `• name (Category) - color: C, occasion: O, season: S`.
///
/// Unset occasion or season render as an empty value.
pub fn inventory_summary(items: &[Item]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "• {} ({}) - color: {}, occasion: {}, season: {}",
                item.name,
                item.category,
                item.color,
                item.occasion.as_deref().unwrap_or(""),
                item.season.as_deref().unwrap_or(""),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// System instruction sent ahead of the conversation history.
pub fn system_prompt(items: &[Item]) -> String {
    format!(
        "You are a fashion assistant. The user owns the following wardrobe:\n{}\n\n\
         Based on the user's message, suggest a complete outfit using appropriate items. \
         Include a top, bottom, and footwear at minimum. Be clear and helpful.",
        inventory_summary(items)
    )
}

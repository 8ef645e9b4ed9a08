use closet_core::{Item, Outfit, SavedOutfit};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", render_table(headers, rows));
}

pub fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    // Column widths in characters, not bytes: names may hold "–" and "•".
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    out.push_str(header_row.join("  ").trim_end());
    out.push('\n');

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&sep.join("  "));
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Table of items with their store positions.
pub fn item_table(items: &[(usize, &Item)]) -> String {
    let rows = items
        .iter()
        .map(|(pos, item)| {
            vec![
                pos.to_string(),
                item.name.clone(),
                item.category.to_string(),
                item.color.clone(),
                item.occasion.clone().unwrap_or_default(),
                item.season.clone().unwrap_or_default(),
                item.image.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render_table(
        &["#", "NAME", "CATEGORY", "COLOR", "OCCASION", "SEASON", "IMAGE"],
        rows,
    )
}

/// `name – Category` followed by an attribute line.
pub fn describe_item(item: &Item) -> String {
    let mut s = format!(
        "{} – {}\n    Color: {} | Occasion: {} | Season: {}",
        item.name,
        item.category,
        item.color,
        item.occasion.as_deref().unwrap_or("-"),
        item.season.as_deref().unwrap_or("-"),
    );
    if let Some(url) = &item.image {
        s.push_str(&format!("\n    Image: {url}"));
    }
    s
}

pub fn describe_outfit(outfit: &Outfit) -> String {
    outfit
        .items()
        .iter()
        .map(|item| format!("  {}", describe_item(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered list of saved outfits, or `empty` when there are none.
pub fn describe_saved(outfits: &[SavedOutfit], empty: &str) -> String {
    if outfits.is_empty() {
        return empty.to_string();
    }
    outfits
        .iter()
        .enumerate()
        .map(|(pos, saved)| {
            let when = saved
                .saved_at
                .map(|t| format!(" (saved {})", t.format("%Y-%m-%d")))
                .unwrap_or_default();
            format!("Outfit {pos}{when}:\n{}", describe_outfit(&saved.outfit))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use closet_core::Category;

    #[test]
    fn table_pads_columns() {
        let out = render_table(
            &["#", "NAME"],
            vec![vec!["0".into(), "Tee".into()], vec!["10".into(), "Hoodie".into()]],
        );
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "#   NAME");
        assert_eq!(lines[1], "--  ------");
        assert_eq!(lines[3], "10  Hoodie");
    }

    #[test]
    fn describe_item_marks_unset_fields() {
        let item = Item::new("Boots", Category::Shoes, "Brown").with_season("Winter");
        assert_eq!(
            describe_item(&item),
            "Boots – Shoes\n    Color: Brown | Occasion: - | Season: Winter"
        );
    }
}

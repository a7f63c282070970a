pub mod collection;
pub mod create;
pub mod folders;
pub mod images;
pub mod import;
pub mod keyword;
pub mod status;
pub mod xmp;

use std::collections::{HashMap, HashSet};

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

/// Empty table with the shared look and the given header row.
pub(crate) fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}

/// Print a section header the way every command does.
pub(crate) fn heading(title: &str) {
    println!();
    println!("  {title}");
    println!("  {}", "-".repeat(title.chars().count()));
}

/// Render an optional value, or a dash when absent.
pub(crate) fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Depth-first order of a parent-linked forest, with each item's depth.
/// Items whose parent is not in the slice are treated as top level.
pub(crate) fn forest<T>(
    items: &[T],
    id: impl Fn(&T) -> i64,
    parent: impl Fn(&T) -> Option<i64>,
) -> Vec<(&T, usize)> {
    let known: HashSet<i64> = items.iter().map(&id).collect();
    let mut children: HashMap<i64, Vec<&T>> = HashMap::new();
    for item in items {
        if let Some(p) = parent(item).filter(|p| known.contains(p)) {
            children.entry(p).or_default().push(item);
        }
    }

    let mut stack: Vec<(&T, usize)> = items
        .iter()
        .filter(|item| parent(*item).map_or(true, |p| !known.contains(&p)))
        .rev()
        .map(|item| (item, 0))
        .collect();
    let mut ordered = Vec::with_capacity(items.len());
    while let Some((item, depth)) = stack.pop() {
        ordered.push((item, depth));
        if let Some(kids) = children.get(&id(item)) {
            stack.extend(kids.iter().rev().map(|k| (*k, depth + 1)));
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(3)), "3");
        assert_eq!(or_dash::<u8>(None), "-");
    }

    #[test]
    fn test_forest_depths() {
        let items = [(1, None), (2, Some(1)), (3, Some(2)), (4, None), (5, Some(42))];
        let order: Vec<(i64, usize)> = forest(&items, |i| i.0, |i| i.1)
            .into_iter()
            .map(|(i, d)| (i.0, d))
            .collect();
        assert_eq!(order, vec![(1, 0), (2, 1), (3, 2), (4, 0), (5, 0)]);
    }

    #[test]
    fn test_table_has_header() {
        let rendered = table(&["ID", "Name"]).to_string();
        assert!(rendered.contains("ID"));
        assert!(rendered.contains("Name"));
    }
}

use anyhow::Result;
use comfy_table::Cell;
use lrcat_core::domain::CatalogStats;
use lrcat_core::Library;

use super::{heading, table};

pub(crate) fn stat_rows(stats: &CatalogStats) -> Vec<(&'static str, String)> {
    vec![
        ("Schema version", stats.db_version.clone()),
        ("Root folders", stats.root_folders.to_string()),
        ("Folders", stats.folders.to_string()),
        ("Images", stats.images.to_string()),
        ("Keywords", stats.keywords.to_string()),
        ("Collections", stats.collections.to_string()),
    ]
}

pub fn run(library: &Library) -> Result<()> {
    let catalog = library.catalog();
    let stats = library.status()?;

    heading("Catalog");
    if let Some(path) = catalog.path() {
        println!("  {}", path.display());
    }
    if catalog.is_read_only() {
        println!("  (read-only)");
    }

    let mut summary = table(&["", "Count"]);
    for (label, value) in stat_rows(&stats) {
        summary.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    println!("{summary}");

    let sessions = catalog.import_sessions()?;
    if let Some(last) = sessions.last() {
        println!(
            "  Last import: {} ({} images)",
            last.import_date.format("%Y-%m-%d %H:%M:%S"),
            last.image_count
        );
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_rows_order() {
        let stats = CatalogStats {
            db_version: "1500000".to_string(),
            root_folders: 1,
            folders: 2,
            images: 3,
            keywords: 4,
            collections: 5,
        };
        let rows = stat_rows(&stats);
        assert_eq!(rows[0], ("Schema version", "1500000".to_string()));
        assert_eq!(rows[3], ("Images", "3".to_string()));
        assert_eq!(rows.len(), 6);
    }
}

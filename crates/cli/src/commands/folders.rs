use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Cell;
use lrcat_core::Library;

use super::{heading, table};

pub fn add(library: &Library, path: &Path) -> Result<()> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("cannot resolve {}", path.display()))?;
    let root = library
        .catalog()
        .add_root_folder(&absolute.to_string_lossy())?;
    println!("Added root folder #{}: {}", root.id, root.absolute_path);
    Ok(())
}

pub fn list(library: &Library) -> Result<()> {
    let catalog = library.catalog();
    let roots = catalog.list_root_folders()?;
    if roots.is_empty() {
        println!("No root folders. Import a directory or run `lrcat folders add <path>`.");
        return Ok(());
    }

    for root in roots {
        heading(&format!("{} (#{})", root.name, root.id));
        println!("  {}", root.absolute_path);

        let mut t = table(&["ID", "Path from root"]);
        for folder in catalog.list_folders(root.id)? {
            let shown = if folder.path_from_root.is_empty() {
                ".".to_string()
            } else {
                folder.path_from_root
            };
            t.add_row(vec![Cell::new(folder.id), Cell::new(shown)]);
        }
        println!("{t}");
    }
    println!();
    Ok(())
}

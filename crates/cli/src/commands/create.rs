use std::path::Path;

use anyhow::{bail, Result};
use lrcat_core::config::CatalogOptions;
use lrcat_core::Library;

pub fn run(path: &Path, options: CatalogOptions, force: bool) -> Result<Library> {
    if path.exists() && !force {
        bail!(
            "{} already exists (pass --force to replace it)",
            path.display()
        );
    }
    if path.exists() {
        tracing::warn!(path = %path.display(), "replacing existing catalog");
    }
    let library = Library::create(path, options)?;
    println!("Created catalog: {}", path.display());
    Ok(library)
}

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod scanner;
pub mod timestamp;
pub mod xmp;

use std::path::{Path, PathBuf};

use catalog::Catalog;
use config::CatalogOptions;
use domain::*;
use error::Result;

/// Callback for reporting import progress.
pub enum ImportProgress {
    /// The directory walk finished.
    Scanned { directory: PathBuf, file_count: usize },
    /// A file is already in the catalog and was left alone.
    Skipped { path: PathBuf },
    /// A file was added to the catalog.
    Imported { path: PathBuf, image_id: i64 },
}

/// What an import did.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    /// `None` when every scanned file was already cataloged.
    pub session: Option<ImportSession>,
    pub images: Vec<Image>,
    pub skipped: usize,
}

/// The main entry point: a catalog plus the directory import workflow.
pub struct Library {
    catalog: Catalog,
}

impl Library {
    /// Create a fresh catalog at `path`.
    pub fn create(path: &Path, options: CatalogOptions) -> Result<Self> {
        let catalog = Catalog::create(path, options)?;
        Ok(Self { catalog })
    }

    /// Open an existing catalog at `path`.
    pub fn open(path: &Path, options: CatalogOptions) -> Result<Self> {
        let catalog = Catalog::open(path, options)?;
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Import every supported file under `dir` that is not cataloged yet.
    /// All new images land in a single import session, or none do.
    pub fn import_directory(
        &mut self,
        dir: &Path,
        recursive: bool,
        mut progress_cb: Option<&mut dyn FnMut(ImportProgress)>,
    ) -> Result<ImportSummary> {
        let scanned = scanner::scan_directory(dir, recursive)?;
        if let Some(ref mut cb) = progress_cb {
            cb(ImportProgress::Scanned {
                directory: dir.to_path_buf(),
                file_count: scanned.len(),
            });
        }

        let mut fresh = Vec::with_capacity(scanned.len());
        let mut skipped = 0;
        for input in scanned {
            if self.catalog.image_exists(&input.path.to_string_lossy())? {
                skipped += 1;
                if let Some(ref mut cb) = progress_cb {
                    cb(ImportProgress::Skipped { path: input.path });
                }
            } else {
                fresh.push(input);
            }
        }

        if fresh.is_empty() {
            tracing::info!(dir = %dir.display(), skipped, "nothing new to import");
            return Ok(ImportSummary {
                session: None,
                images: Vec::new(),
                skipped,
            });
        }

        let (session, images) = self.catalog.add_images(&fresh)?;
        if let Some(ref mut cb) = progress_cb {
            for (input, image) in fresh.iter().zip(&images) {
                cb(ImportProgress::Imported {
                    path: input.path.clone(),
                    image_id: image.id,
                });
            }
        }

        tracing::info!(
            dir = %dir.display(),
            import = session.id,
            imported = images.len(),
            skipped,
            "import complete"
        );
        Ok(ImportSummary {
            session: Some(session),
            images,
            skipped,
        })
    }

    /// Summary counts for the catalog.
    pub fn status(&self) -> Result<CatalogStats> {
        self.catalog.stats()
    }
}

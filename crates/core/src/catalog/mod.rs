pub mod schema;

mod aggregate;
mod collections;
mod folders;
mod hierarchy;
mod images;
mod keywords;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use crate::config::CatalogOptions;
use crate::domain::CatalogStats;
use crate::error::{Error, Result};

pub use folders::{match_root, normalize_directory, normalize_path};
pub use hierarchy::{child_genealogy, genealogy_ids};

/// A Lightroom Classic catalog (`.lrcat`) opened for reading or editing.
///
/// One writer at a time: nothing here locks or retries, and composite
/// operations rely on SQLite transactions for atomicity.
pub struct Catalog {
    conn: Connection,
    path: Option<PathBuf>,
    options: CatalogOptions,
}

impl Catalog {
    /// Create a new catalog at `path`, replacing any file already there.
    pub fn create(path: &Path, options: CatalogOptions) -> Result<Self> {
        if options.read_only {
            return Err(Error::ReadOnly);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        let mut conn = Connection::open(path)?;
        schema::initialize(&mut conn)?;
        tracing::debug!(path = %path.display(), "created catalog");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            options,
        })
    }

    /// Open an existing catalog. Read-only catalogs are opened immutable.
    pub fn open(path: &Path, options: CatalogOptions) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::CatalogNotFound(path.to_path_buf()));
        }
        let conn = if options.read_only {
            Connection::open_with_flags(
                read_only_uri(path),
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        } else {
            Connection::open(path)?
        };
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            options,
        })
    }

    /// Open an in-memory catalog (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with(CatalogOptions::default())
    }

    pub fn open_in_memory_with(options: CatalogOptions) -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        schema::initialize(&mut conn)?;
        Ok(Self {
            conn,
            path: None,
            options,
        })
    }

    /// File path, `None` for in-memory catalogs.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.options.read_only {
            return Err(Error::ReadOnly);
        }
        Ok(())
    }

    /// The `Adobe_DBVersion` variable, if the catalog has one.
    pub fn db_version(&self) -> Result<Option<String>> {
        let version = self
            .conn
            .query_row(
                "SELECT value FROM Adobe_variablesTable WHERE name = 'Adobe_DBVersion'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version)
    }

    pub fn image_count(&self) -> Result<usize> {
        self.count_rows("SELECT COUNT(*) FROM Adobe_images")
    }

    pub fn folder_count(&self) -> Result<usize> {
        self.count_rows("SELECT COUNT(*) FROM AgLibraryFolder")
    }

    pub fn root_folder_count(&self) -> Result<usize> {
        self.count_rows("SELECT COUNT(*) FROM AgLibraryRootFolder")
    }

    pub fn keyword_count(&self) -> Result<usize> {
        self.count_rows("SELECT COUNT(*) FROM AgLibraryKeyword")
    }

    pub fn collection_count(&self) -> Result<usize> {
        self.count_rows("SELECT COUNT(*) FROM AgLibraryCollection WHERE systemOnly = ''")
    }

    fn count_rows(&self, sql: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Every summary count in one query.
    pub fn stats(&self) -> Result<CatalogStats> {
        let (root_folders, folders, images, keywords, collections) = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM AgLibraryRootFolder),
                (SELECT COUNT(*) FROM AgLibraryFolder),
                (SELECT COUNT(*) FROM Adobe_images),
                (SELECT COUNT(*) FROM AgLibraryKeyword),
                (SELECT COUNT(*) FROM AgLibraryCollection WHERE systemOnly = '')",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)? as usize,
                    row.get::<_, i64>(1)? as usize,
                    row.get::<_, i64>(2)? as usize,
                    row.get::<_, i64>(3)? as usize,
                    row.get::<_, i64>(4)? as usize,
                ))
            },
        )?;
        Ok(CatalogStats {
            db_version: self.db_version()?.unwrap_or_default(),
            root_folders,
            folders,
            images,
            keywords,
            collections,
        })
    }

    /// Set a catalog variable, inserting it if missing.
    pub fn set_variable(&self, name: &str, value: &str) -> Result<()> {
        self.ensure_writable()?;
        let updated = self.conn.execute(
            "UPDATE Adobe_variablesTable SET value = ?1 WHERE name = ?2",
            params![value, name],
        )?;
        if updated == 0 {
            self.conn.execute(
                "INSERT INTO Adobe_variablesTable (id_global, name, type, value) VALUES (?1, ?2, 'string', ?3)",
                params![new_uuid(), name, value],
            )?;
        }
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM Adobe_variablesTable WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

/// SQLite URI for an immutable read-only open. The path is percent-encoded
/// so `#`, `?` and `%` in file names survive; SQLite decodes it back.
fn read_only_uri(path: &Path) -> String {
    format!(
        "file:{}?mode=ro&immutable=1",
        urlencoding::encode(&path.to_string_lossy())
    )
}

/// Uppercase v4 UUID as used in every `id_global` column.
pub(crate) fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string().to_uppercase()
}

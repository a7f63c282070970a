//! Root folders, folders, and the mapping from a directory onto them.
//!
//! Every path stored in the catalog uses forward slashes. Root folder paths and
//! non-empty folder paths always end with `/`, so a root matches a directory by
//! plain string prefix and the remainder is the folder's `pathFromRoot`.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{new_uuid, Catalog};
use crate::config::RootMatch;
use crate::domain::{Folder, RootFolder};
use crate::error::{Error, Result};

const ROOT_COLUMNS: &str = "id_local, id_global, absolutePath, name";
const FOLDER_COLUMNS: &str = "id_local, id_global, rootFolder, pathFromRoot, parentId";

/// Unify separators to `/` and collapse runs of them.
///
/// A leading `//` (UNC share) is preserved. No other cleanup is attempted:
/// `.` and `..` segments are kept as written.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let (lead, rest) = match unified.strip_prefix("//") {
        Some(rest) if !rest.starts_with('/') => ("//", rest),
        _ => ("", unified.as_str()),
    };

    let mut out = String::with_capacity(unified.len());
    out.push_str(lead);
    let mut prev_slash = false;
    for c in rest.chars() {
        let slash = c == '/';
        if !(slash && prev_slash) {
            out.push(c);
        }
        prev_slash = slash;
    }
    out
}

/// [`normalize_path`] plus a guaranteed trailing `/`.
pub fn normalize_directory(dir: &str) -> String {
    let mut dir = normalize_path(dir);
    if !dir.ends_with('/') {
        dir.push('/');
    }
    dir
}

/// Relative folder path: no leading `/`, trailing `/` unless empty.
fn normalize_relative(path: &str) -> String {
    let path = normalize_path(path);
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        String::new()
    } else if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Pick the root folder that should own `dir` (already normalized).
pub fn match_root<'a>(roots: &'a [RootFolder], dir: &str, policy: RootMatch) -> Option<&'a RootFolder> {
    let candidates = roots
        .iter()
        .filter(|root| dir.starts_with(root.absolute_path.as_str()));
    match policy {
        RootMatch::LongestPrefix => candidates.max_by_key(|root| root.absolute_path.len()),
        RootMatch::FirstRegistered => candidates.min_by_key(|root| root.id),
    }
}

/// Split a file path into its normalized directory and file name.
/// A bare file name is treated as living in `./`.
pub(crate) fn split_file_path(path: &str) -> (String, String) {
    let path = normalize_path(path);
    match path.rsplit_once('/') {
        Some((dir, name)) => (format!("{dir}/"), name.to_string()),
        None => ("./".to_string(), path),
    }
}

/// Split `IMG_0001.CR2` into `("IMG_0001", "CR2")`. Dot files have no extension.
pub(crate) fn split_file_name(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, ext),
        _ => (name, ""),
    }
}

/// Display name of a root folder: its last path segment.
fn folder_name(absolute_path: &str) -> String {
    absolute_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(absolute_path)
        .to_string()
}

fn root_from_row(row: &Row) -> rusqlite::Result<RootFolder> {
    Ok(RootFolder {
        id: row.get(0)?,
        uuid: row.get(1)?,
        absolute_path: row.get(2)?,
        name: row.get(3)?,
    })
}

fn folder_from_row(row: &Row) -> rusqlite::Result<Folder> {
    Ok(Folder {
        id: row.get(0)?,
        uuid: row.get(1)?,
        root_folder_id: row.get(2)?,
        path_from_root: row.get(3)?,
        parent_id: row.get(4)?,
    })
}

fn find_root_by_path(conn: &Connection, absolute_path: &str) -> Result<Option<RootFolder>> {
    let root = conn
        .query_row(
            &format!("SELECT {ROOT_COLUMNS} FROM AgLibraryRootFolder WHERE absolutePath = ?1"),
            params![absolute_path],
            root_from_row,
        )
        .optional()?;
    Ok(root)
}

fn find_root(conn: &Connection, id: i64) -> Result<RootFolder> {
    conn.query_row(
        &format!("SELECT {ROOT_COLUMNS} FROM AgLibraryRootFolder WHERE id_local = ?1"),
        params![id],
        root_from_row,
    )
    .optional()?
    .ok_or(Error::RootFolderNotFound(id))
}

fn find_folder(conn: &Connection, root_id: i64, path_from_root: &str) -> Result<Option<Folder>> {
    let folder = conn
        .query_row(
            &format!(
                "SELECT {FOLDER_COLUMNS} FROM AgLibraryFolder WHERE rootFolder = ?1 AND pathFromRoot = ?2"
            ),
            params![root_id, path_from_root],
            folder_from_row,
        )
        .optional()?;
    Ok(folder)
}

/// Roots in registration order.
fn registered_roots(conn: &Connection) -> Result<Vec<RootFolder>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ROOT_COLUMNS} FROM AgLibraryRootFolder ORDER BY id_local"
    ))?;
    let roots = stmt
        .query_map([], root_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(roots)
}

pub(crate) fn insert_root_folder(conn: &Connection, path: &str) -> Result<RootFolder> {
    let absolute_path = normalize_directory(path);
    if find_root_by_path(conn, &absolute_path)?.is_some() {
        return Err(Error::RootFolderExists(absolute_path));
    }
    let uuid = new_uuid();
    let name = folder_name(&absolute_path);
    conn.execute(
        "INSERT INTO AgLibraryRootFolder (id_global, absolutePath, name, relativePathFromCatalog)
         VALUES (?1, ?2, ?3, NULL)",
        params![uuid, absolute_path, name],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, path = %absolute_path, "registered root folder");
    Ok(RootFolder {
        id,
        uuid,
        absolute_path,
        name,
    })
}

fn insert_folder(conn: &Connection, root_id: i64, path_from_root: String) -> Result<Folder> {
    let uuid = new_uuid();
    conn.execute(
        "INSERT INTO AgLibraryFolder (id_global, rootFolder, pathFromRoot, parentId, visibility)
         VALUES (?1, ?2, ?3, NULL, NULL)",
        params![uuid, root_id, path_from_root],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, root = root_id, path = %path_from_root, "created folder");
    Ok(Folder {
        id,
        uuid,
        root_folder_id: root_id,
        parent_id: None,
        path_from_root,
    })
}

pub(crate) fn get_or_create_folder(conn: &Connection, root_id: i64, path_from_root: &str) -> Result<Folder> {
    let path_from_root = normalize_relative(path_from_root);
    if let Some(folder) = find_folder(conn, root_id, &path_from_root)? {
        return Ok(folder);
    }
    find_root(conn, root_id)?;
    insert_folder(conn, root_id, path_from_root)
}

/// Map a directory onto `(root folder, folder)`, creating either as needed.
///
/// Without a matching root, the directory itself becomes a new root and the
/// folder sits at the empty relative path.
pub(crate) fn resolve_directory(conn: &Connection, dir: &str, policy: RootMatch) -> Result<(RootFolder, Folder)> {
    let dir = normalize_directory(dir);
    let roots = registered_roots(conn)?;
    let (root, relative) = match match_root(&roots, &dir, policy) {
        Some(root) => (root.clone(), &dir[root.absolute_path.len()..]),
        None => (insert_root_folder(conn, &dir)?, ""),
    };
    let folder = get_or_create_folder(conn, root.id, relative)?;
    Ok((root, folder))
}

impl Catalog {
    /// Register a root folder. Fails with `RootFolderExists` for a known path.
    pub fn add_root_folder(&self, path: &str) -> Result<RootFolder> {
        self.ensure_writable()?;
        insert_root_folder(&self.conn, path)
    }

    pub fn root_folder(&self, id: i64) -> Result<RootFolder> {
        find_root(&self.conn, id)
    }

    pub fn root_folder_by_path(&self, path: &str) -> Result<Option<RootFolder>> {
        find_root_by_path(&self.conn, &normalize_directory(path))
    }

    /// All root folders, sorted by display name.
    pub fn list_root_folders(&self) -> Result<Vec<RootFolder>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ROOT_COLUMNS} FROM AgLibraryRootFolder ORDER BY name, id_local"
        ))?;
        let roots = stmt
            .query_map([], root_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(roots)
    }

    /// Create a folder under a root. Fails with `FolderExists` if the path is taken.
    pub fn add_folder(&self, root_id: i64, path_from_root: &str) -> Result<Folder> {
        self.ensure_writable()?;
        let path_from_root = normalize_relative(path_from_root);
        find_root(&self.conn, root_id)?;
        if find_folder(&self.conn, root_id, &path_from_root)?.is_some() {
            return Err(Error::FolderExists {
                root: root_id,
                path: path_from_root,
            });
        }
        insert_folder(&self.conn, root_id, path_from_root)
    }

    pub fn folder(&self, id: i64) -> Result<Folder> {
        self.conn
            .query_row(
                &format!("SELECT {FOLDER_COLUMNS} FROM AgLibraryFolder WHERE id_local = ?1"),
                params![id],
                folder_from_row,
            )
            .optional()?
            .ok_or(Error::FolderNotFound(id))
    }

    pub fn get_or_create_folder(&self, root_id: i64, path_from_root: &str) -> Result<Folder> {
        self.ensure_writable()?;
        get_or_create_folder(&self.conn, root_id, path_from_root)
    }

    /// Folders under a root, sorted by relative path.
    pub fn list_folders(&self, root_id: i64) -> Result<Vec<Folder>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {FOLDER_COLUMNS} FROM AgLibraryFolder WHERE rootFolder = ?1 ORDER BY pathFromRoot"
        ))?;
        let folders = stmt
            .query_map(params![root_id], folder_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(folders)
    }

    /// Resolve a directory to its root folder and folder, creating them as needed,
    /// using the catalog's [`RootMatch`] policy.
    pub fn resolve_directory(&mut self, dir: &str) -> Result<(RootFolder, Folder)> {
        self.ensure_writable()?;
        let policy = self.options.root_match;
        let tx = self.conn.transaction()?;
        let resolved = resolve_directory(&tx, dir, policy)?;
        tx.commit()?;
        Ok(resolved)
    }
}

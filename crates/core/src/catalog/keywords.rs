use chrono::{Local, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::hierarchy::{split_hierarchy_path, KEYWORDS};
use super::images::{ensure_image, image_from_row, IMAGE_SELECT};
use super::{new_uuid, Catalog};
use crate::domain::{Image, Keyword};
use crate::error::{Error, Result};
use crate::timestamp::{format_capture_time, to_lightroom_timestamp};

const KEYWORD_COLUMNS: &str = "k.id_local, k.id_global, k.name, k.lc_name, k.parent, k.genealogy, k.includeOnExport";

fn keyword_from_row(row: &Row) -> rusqlite::Result<Keyword> {
    let name: Option<String> = row.get(2)?;
    let lc_name: Option<String> = row.get(3)?;
    let include_on_export: Option<i64> = row.get(6)?;
    Ok(Keyword {
        id: row.get(0)?,
        uuid: row.get(1)?,
        name: name.unwrap_or_default(),
        lc_name: lc_name.unwrap_or_default(),
        parent_id: row.get(4)?,
        genealogy: row.get(5)?,
        include_on_export: include_on_export.unwrap_or(1) != 0,
    })
}

fn find_keyword(conn: &Connection, id: i64) -> Result<Keyword> {
    conn.query_row(
        &format!("SELECT {KEYWORD_COLUMNS} FROM AgLibraryKeyword k WHERE k.id_local = ?1"),
        params![id],
        keyword_from_row,
    )
    .optional()?
    .ok_or(Error::KeywordNotFound(id))
}

/// Case-insensitive lookup among the children of `parent` (top level for `None`).
fn find_in_parent(conn: &Connection, name: &str, parent: Option<i64>) -> Result<Option<Keyword>> {
    let keyword = conn
        .query_row(
            &format!(
                "SELECT {KEYWORD_COLUMNS} FROM AgLibraryKeyword k
                 WHERE k.lc_name = ?1 AND k.parent IS ?2 ORDER BY k.id_local LIMIT 1"
            ),
            params![name.to_lowercase(), parent],
            keyword_from_row,
        )
        .optional()?;
    Ok(keyword)
}

fn insert_keyword(conn: &Connection, name: &str, parent: Option<i64>) -> Result<Keyword> {
    let parent_genealogy = KEYWORDS.parent_genealogy(conn, parent)?;
    let uuid = new_uuid();
    let lc_name = name.to_lowercase();
    conn.execute(
        "INSERT INTO AgLibraryKeyword
            (id_global, name, lc_name, parent, genealogy, dateCreated,
             includeOnExport, includeParents, includeSynonyms)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, 1, 1)",
        params![
            uuid,
            name,
            lc_name,
            parent,
            parent_genealogy,
            format_capture_time(Local::now().naive_local()),
        ],
    )?;
    let id = conn.last_insert_rowid();
    let genealogy = KEYWORDS.stamp(conn, id, &parent_genealogy)?;
    Ok(Keyword {
        id,
        uuid,
        name: name.to_string(),
        lc_name,
        parent_id: parent,
        genealogy,
        include_on_export: true,
    })
}

fn get_or_insert_keyword(conn: &Connection, name: &str, parent: Option<i64>) -> Result<Keyword> {
    match find_in_parent(conn, name, parent)? {
        Some(keyword) => Ok(keyword),
        None => insert_keyword(conn, name, parent),
    }
}

impl Catalog {
    /// Create a keyword, optionally below `parent`.
    pub fn add_keyword(&mut self, name: &str, parent: Option<i64>) -> Result<Keyword> {
        self.ensure_writable()?;
        let tx = self.conn.transaction()?;
        let keyword = insert_keyword(&tx, name, parent)?;
        tx.commit()?;
        Ok(keyword)
    }

    pub fn keyword(&self, id: i64) -> Result<Keyword> {
        find_keyword(&self.conn, id)
    }

    /// First keyword with this name anywhere in the tree, ignoring case.
    pub fn keyword_by_name(&self, name: &str) -> Result<Option<Keyword>> {
        let keyword = self
            .conn
            .query_row(
                &format!(
                    "SELECT {KEYWORD_COLUMNS} FROM AgLibraryKeyword k
                     WHERE k.lc_name = ?1 ORDER BY k.id_local LIMIT 1"
                ),
                params![name.to_lowercase()],
                keyword_from_row,
            )
            .optional()?;
        Ok(keyword)
    }

    /// Return the keyword named `name` (ignoring case) under `parent`, creating it if missing.
    pub fn get_or_create_keyword(&mut self, name: &str, parent: Option<i64>) -> Result<Keyword> {
        self.ensure_writable()?;
        let tx = self.conn.transaction()?;
        let keyword = get_or_insert_keyword(&tx, name, parent)?;
        tx.commit()?;
        Ok(keyword)
    }

    /// Ensure every level of `"Animals/Dogs/Labrador"` exists and return the last one.
    pub fn create_keyword_path(&mut self, path: &str) -> Result<Keyword> {
        self.ensure_writable()?;
        let names = split_hierarchy_path(path)?;
        let tx = self.conn.transaction()?;
        let mut parent = None;
        let mut current = None;
        for name in names {
            let keyword = get_or_insert_keyword(&tx, name, parent)?;
            parent = Some(keyword.id);
            current = Some(keyword);
        }
        tx.commit()?;
        current.ok_or_else(|| Error::EmptyHierarchyPath(path.to_string()))
    }

    pub fn list_keywords(&self) -> Result<Vec<Keyword>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {KEYWORD_COLUMNS} FROM AgLibraryKeyword k ORDER BY k.name, k.id_local"
        ))?;
        let keywords = stmt
            .query_map([], keyword_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keywords)
    }

    /// Parent chain of a keyword, nearest parent first.
    pub fn keyword_ancestors(&self, id: i64) -> Result<Vec<Keyword>> {
        KEYWORDS
            .ancestor_ids(&self.conn, id)?
            .into_iter()
            .map(|ancestor| find_keyword(&self.conn, ancestor))
            .collect()
    }

    /// Tag an image. Returns `false` when the tag was already there.
    pub fn add_keyword_to_image(&mut self, image_id: i64, keyword_id: i64) -> Result<bool> {
        self.ensure_writable()?;
        let tx = self.conn.transaction()?;
        ensure_image(&tx, image_id)?;
        find_keyword(&tx, keyword_id)?;

        let existing = tx
            .query_row(
                "SELECT 1 FROM AgLibraryKeywordImage WHERE image = ?1 AND tag = ?2",
                params![image_id, keyword_id],
                |_| Ok(()),
            )
            .optional()?;
        if existing.is_none() {
            tx.execute(
                "INSERT INTO AgLibraryKeywordImage (image, tag) VALUES (?1, ?2)",
                params![image_id, keyword_id],
            )?;
        }
        tx.execute(
            "UPDATE AgLibraryKeyword SET lastApplied = ?1 WHERE id_local = ?2",
            params![to_lightroom_timestamp(Utc::now()), keyword_id],
        )?;
        tx.commit()?;

        tracing::debug!(image = image_id, keyword = keyword_id, added = existing.is_none(), "tagged image");
        Ok(existing.is_none())
    }

    /// Remove a tag. Returns `false` when the image did not carry it.
    pub fn remove_keyword_from_image(&self, image_id: i64, keyword_id: i64) -> Result<bool> {
        self.ensure_writable()?;
        let removed = self.conn.execute(
            "DELETE FROM AgLibraryKeywordImage WHERE image = ?1 AND tag = ?2",
            params![image_id, keyword_id],
        )?;
        Ok(removed > 0)
    }

    pub fn image_keywords(&self, image_id: i64) -> Result<Vec<Keyword>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {KEYWORD_COLUMNS} FROM AgLibraryKeyword k
             JOIN AgLibraryKeywordImage ki ON ki.tag = k.id_local
             WHERE ki.image = ?1 ORDER BY k.name, k.id_local"
        ))?;
        let keywords = stmt
            .query_map(params![image_id], keyword_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keywords)
    }

    pub fn keyword_images(&self, keyword_id: i64) -> Result<Vec<Image>> {
        let mut stmt = self.conn.prepare(&format!(
            "{IMAGE_SELECT} JOIN AgLibraryKeywordImage ki ON ki.image = i.id_local
             WHERE ki.tag = ?1 GROUP BY i.id_local ORDER BY i.captureTime, i.id_local"
        ))?;
        let images = stmt
            .query_map(params![keyword_id], image_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(images)
    }
}

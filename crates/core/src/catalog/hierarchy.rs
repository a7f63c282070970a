//! Genealogy strings for tree-shaped entities (keywords and collections).
//!
//! A genealogy is the slash-joined chain of ids from the topmost ancestor down
//! to the entity itself, e.g. `"3/17/42"`. The entity's own id is only known
//! after its row is inserted, so creation happens in two phases: insert with
//! the parent's genealogy, then [`Tree::stamp`] the final value. Callers run
//! both phases in the same transaction. Genealogies are fixed at creation and
//! are not rewritten when an ancestor changes later.

use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};

pub(crate) struct Tree {
    pub(crate) table: &'static str,
    pub(crate) entity: &'static str,
    pub(crate) not_found: fn(i64) -> Error,
}

pub(crate) const KEYWORDS: Tree = Tree {
    table: "AgLibraryKeyword",
    entity: "keyword",
    not_found: Error::KeywordNotFound,
};

pub(crate) const COLLECTIONS: Tree = Tree {
    table: "AgLibraryCollection",
    entity: "collection",
    not_found: Error::CollectionNotFound,
};

impl Tree {
    /// Genealogy of `parent`, or the empty string for a top-level entity.
    pub(crate) fn parent_genealogy(&self, conn: &Connection, parent: Option<i64>) -> Result<String> {
        let Some(parent_id) = parent else {
            return Ok(String::new());
        };
        conn.query_row(
            &format!("SELECT genealogy FROM {} WHERE id_local = ?1", self.table),
            params![parent_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(Error::ParentNotFound {
            entity: self.entity,
            id: parent_id,
        })
    }

    /// Write the final genealogy onto a freshly inserted row.
    pub(crate) fn stamp(&self, conn: &Connection, id: i64, parent_genealogy: &str) -> Result<String> {
        let genealogy = child_genealogy(parent_genealogy, id);
        conn.execute(
            &format!("UPDATE {} SET genealogy = ?1 WHERE id_local = ?2", self.table),
            params![genealogy, id],
        )?;
        tracing::debug!(entity = self.entity, id, genealogy = %genealogy, "stamped genealogy");
        Ok(genealogy)
    }

    /// Ids of the parent chain above `id`, nearest parent first.
    pub(crate) fn ancestor_ids(&self, conn: &Connection, id: i64) -> Result<Vec<i64>> {
        let sql = format!("SELECT parent FROM {} WHERE id_local = ?1", self.table);
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = id;
        loop {
            let parent: Option<i64> = conn
                .query_row(&sql, params![current], |row| row.get(0))
                .optional()?
                .ok_or_else(|| (self.not_found)(current))?;
            match parent {
                // a cycle can only come from hand-edited rows; stop instead of spinning
                Some(p) if seen.insert(p) => {
                    ancestors.push(p);
                    current = p;
                }
                _ => return Ok(ancestors),
            }
        }
    }

    /// Ids of every entity whose genealogy descends from `genealogy`.
    pub(crate) fn descendant_ids(&self, conn: &Connection, genealogy: &str) -> Result<Vec<i64>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id_local FROM {} WHERE genealogy LIKE ?1 || '/%' ORDER BY id_local",
            self.table
        ))?;
        let ids = stmt
            .query_map(params![genealogy], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }
}

/// Genealogy of a child with id `id` below a parent with `parent_genealogy`.
pub fn child_genealogy(parent_genealogy: &str, id: i64) -> String {
    if parent_genealogy.is_empty() {
        id.to_string()
    } else {
        format!("{parent_genealogy}/{id}")
    }
}

/// Parse a genealogy back into its ids, topmost ancestor first.
pub fn genealogy_ids(genealogy: &str) -> Vec<i64> {
    genealogy
        .split('/')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

/// Split `"Animals/Dogs/Labrador"` into trimmed, non-empty names.
pub(crate) fn split_hierarchy_path(path: &str) -> Result<Vec<&str>> {
    let names: Vec<&str> = path
        .split('/')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return Err(Error::EmptyHierarchyPath(path.to_string()));
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_genealogy() {
        assert_eq!(child_genealogy("", 7), "7");
        assert_eq!(child_genealogy("1/2", 3), "1/2/3");
    }

    #[test]
    fn test_genealogy_ids() {
        assert_eq!(genealogy_ids("1/2/3"), vec![1, 2, 3]);
        assert_eq!(genealogy_ids("42"), vec![42]);
        assert!(genealogy_ids("").is_empty());
    }

    #[test]
    fn test_split_hierarchy_path() {
        assert_eq!(
            split_hierarchy_path(" Animals / Dogs//Labrador ").unwrap(),
            vec!["Animals", "Dogs", "Labrador"]
        );
        assert!(matches!(
            split_hierarchy_path(" / "),
            Err(Error::EmptyHierarchyPath(_))
        ));
    }

    #[test]
    fn test_missing_parent_is_reported() {
        let mut conn = Connection::open_in_memory().unwrap();
        super::super::schema::initialize(&mut conn).unwrap();
        let err = KEYWORDS.parent_genealogy(&conn, Some(99)).unwrap_err();
        assert!(matches!(err, Error::ParentNotFound { entity: "keyword", id: 99 }));
        assert_eq!(KEYWORDS.parent_genealogy(&conn, None).unwrap(), "");
    }

    #[test]
    fn test_ancestors_of_missing_entity() {
        let mut conn = Connection::open_in_memory().unwrap();
        super::super::schema::initialize(&mut conn).unwrap();
        let err = COLLECTIONS.ancestor_ids(&conn, 5).unwrap_err();
        assert!(matches!(err, Error::CollectionNotFound(5)));
    }
}

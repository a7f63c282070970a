use rusqlite::{params, Connection, OptionalExtension, Row};

use super::aggregate::{next_position, refresh_image_count};
use super::hierarchy::{split_hierarchy_path, COLLECTIONS};
use super::images::{ensure_image, image_from_row, IMAGE_SELECT};
use super::Catalog;
use crate::domain::{Collection, CollectionKind, Image};
use crate::error::{Error, Result};

const COLLECTION_COLUMNS: &str = "c.id_local, c.name, c.creationId, c.parent, c.genealogy, c.imageCount";

fn collection_from_row(row: &Row) -> rusqlite::Result<Collection> {
    let creation_id: String = row.get(2)?;
    let image_count: Option<i64> = row.get(5)?;
    Ok(Collection {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: CollectionKind::parse(&creation_id),
        parent_id: row.get(3)?,
        genealogy: row.get(4)?,
        image_count: image_count.and_then(|n| u32::try_from(n).ok()),
    })
}

fn find_collection(conn: &Connection, id: i64) -> Result<Collection> {
    conn.query_row(
        &format!("SELECT {COLLECTION_COLUMNS} FROM AgLibraryCollection c WHERE c.id_local = ?1"),
        params![id],
        collection_from_row,
    )
    .optional()?
    .ok_or(Error::CollectionNotFound(id))
}

/// First row whose name equals `name` ignoring case (full Unicode folding).
fn first_named(
    conn: &Connection,
    where_clause: &str,
    args: &[&dyn rusqlite::ToSql],
    name: &str,
) -> Result<Option<Collection>> {
    let wanted = name.to_lowercase();
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLLECTION_COLUMNS} FROM AgLibraryCollection c
         WHERE {where_clause} ORDER BY c.id_local"
    ))?;
    let mut rows = stmt.query(args)?;
    while let Some(row) = rows.next()? {
        let collection = collection_from_row(row)?;
        if collection.name.to_lowercase() == wanted {
            return Ok(Some(collection));
        }
    }
    Ok(None)
}

/// Case-insensitive lookup among the user collections directly under `parent`.
fn find_in_parent(conn: &Connection, name: &str, parent: Option<i64>) -> Result<Option<Collection>> {
    first_named(conn, "c.parent IS ?1 AND c.systemOnly = ''", &[&parent], name)
}

fn insert_collection(conn: &Connection, name: &str, kind: CollectionKind, parent: Option<i64>) -> Result<Collection> {
    let parent_genealogy = COLLECTIONS.parent_genealogy(conn, parent)?;
    conn.execute(
        "INSERT INTO AgLibraryCollection (creationId, name, parent, genealogy, systemOnly)
         VALUES (?1, ?2, ?3, ?4, '')",
        params![kind.as_str(), name, parent, parent_genealogy],
    )?;
    let id = conn.last_insert_rowid();
    let genealogy = COLLECTIONS.stamp(conn, id, &parent_genealogy)?;
    Ok(Collection {
        id,
        name: name.to_string(),
        kind,
        parent_id: parent,
        genealogy,
        image_count: None,
    })
}

fn get_or_insert_collection(
    conn: &Connection,
    name: &str,
    kind: CollectionKind,
    parent: Option<i64>,
) -> Result<Collection> {
    match find_in_parent(conn, name, parent)? {
        Some(collection) => Ok(collection),
        None => insert_collection(conn, name, kind, parent),
    }
}

impl Catalog {
    /// Create a collection, optionally inside a collection set.
    pub fn add_collection(&mut self, name: &str, kind: CollectionKind, parent: Option<i64>) -> Result<Collection> {
        self.ensure_writable()?;
        let tx = self.conn.transaction()?;
        let collection = insert_collection(&tx, name, kind, parent)?;
        tx.commit()?;
        Ok(collection)
    }

    pub fn collection(&self, id: i64) -> Result<Collection> {
        find_collection(&self.conn, id)
    }

    /// First user collection with this name anywhere in the tree, ignoring case.
    pub fn collection_by_name(&self, name: &str) -> Result<Option<Collection>> {
        first_named(&self.conn, "c.systemOnly = ''", &[], name)
    }

    pub fn get_or_create_collection(
        &mut self,
        name: &str,
        kind: CollectionKind,
        parent: Option<i64>,
    ) -> Result<Collection> {
        self.ensure_writable()?;
        let tx = self.conn.transaction()?;
        let collection = get_or_insert_collection(&tx, name, kind, parent)?;
        tx.commit()?;
        Ok(collection)
    }

    /// Ensure `"Trips/2024/Rome"` exists. Every level but the last is a
    /// collection set; the last one gets `kind`.
    pub fn create_collection_path(&mut self, path: &str, kind: CollectionKind) -> Result<Collection> {
        self.ensure_writable()?;
        let names = split_hierarchy_path(path)?;
        let last = names.len() - 1;
        let tx = self.conn.transaction()?;
        let mut parent = None;
        let mut current = None;
        for (i, name) in names.into_iter().enumerate() {
            let level_kind = if i == last { kind } else { CollectionKind::Group };
            let collection = get_or_insert_collection(&tx, name, level_kind, parent)?;
            parent = Some(collection.id);
            current = Some(collection);
        }
        tx.commit()?;
        current.ok_or_else(|| Error::EmptyHierarchyPath(path.to_string()))
    }

    /// User collections (system ones excluded), sorted by name.
    pub fn list_collections(&self) -> Result<Vec<Collection>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLLECTION_COLUMNS} FROM AgLibraryCollection c
             WHERE c.systemOnly = '' ORDER BY c.name, c.id_local"
        ))?;
        let collections = stmt
            .query_map([], collection_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(collections)
    }

    /// Parent chain of a collection, nearest parent first.
    pub fn collection_ancestors(&self, id: i64) -> Result<Vec<Collection>> {
        COLLECTIONS
            .ancestor_ids(&self.conn, id)?
            .into_iter()
            .map(|ancestor| find_collection(&self.conn, ancestor))
            .collect()
    }

    /// Append an image to a collection. Returns `false` if it was already a member.
    pub fn add_image_to_collection(&mut self, collection_id: i64, image_id: i64) -> Result<bool> {
        self.ensure_writable()?;
        let tx = self.conn.transaction()?;
        let collection = find_collection(&tx, collection_id)?;
        if collection.kind == CollectionKind::Group {
            return Err(Error::CollectionSet(collection_id));
        }
        ensure_image(&tx, image_id)?;

        let existing = tx
            .query_row(
                "SELECT 1 FROM AgLibraryCollectionImage WHERE collection = ?1 AND image = ?2",
                params![collection_id, image_id],
                |_| Ok(()),
            )
            .optional()?;
        if existing.is_none() {
            let position = next_position(&tx, collection_id)?;
            tx.execute(
                "INSERT INTO AgLibraryCollectionImage (collection, image, pick, positionInCollection)
                 VALUES (?1, ?2, 0, ?3)",
                params![collection_id, image_id, position],
            )?;
        }
        let count = refresh_image_count(&tx, collection_id)?;
        tx.commit()?;

        tracing::debug!(collection = collection_id, image = image_id, count, "added image to collection");
        Ok(existing.is_none())
    }

    /// Remove an image from a collection. Remaining positions keep their gaps.
    pub fn remove_image_from_collection(&mut self, collection_id: i64, image_id: i64) -> Result<bool> {
        self.ensure_writable()?;
        let tx = self.conn.transaction()?;
        find_collection(&tx, collection_id)?;
        let removed = tx.execute(
            "DELETE FROM AgLibraryCollectionImage WHERE collection = ?1 AND image = ?2",
            params![collection_id, image_id],
        )?;
        let count = refresh_image_count(&tx, collection_id)?;
        tx.commit()?;

        tracing::debug!(collection = collection_id, image = image_id, count, "removed image from collection");
        Ok(removed > 0)
    }

    /// Images of a collection in collection order.
    pub fn collection_images(&self, collection_id: i64) -> Result<Vec<Image>> {
        find_collection(&self.conn, collection_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "{IMAGE_SELECT} JOIN AgLibraryCollectionImage ci ON ci.image = i.id_local
             WHERE ci.collection = ?1 ORDER BY ci.positionInCollection, ci.id_local"
        ))?;
        let images = stmt
            .query_map(params![collection_id], image_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(images)
    }

    pub fn image_collections(&self, image_id: i64) -> Result<Vec<Collection>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {COLLECTION_COLUMNS} FROM AgLibraryCollection c
             JOIN AgLibraryCollectionImage ci ON ci.collection = c.id_local
             WHERE ci.image = ?1 ORDER BY c.name, c.id_local"
        ))?;
        let collections = stmt
            .query_map(params![image_id], collection_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(collections)
    }

    /// Delete a collection together with everything nested below it.
    /// Images stay in the catalog. Returns the number of collections removed.
    pub fn delete_collection(&mut self, id: i64) -> Result<usize> {
        self.ensure_writable()?;
        let tx = self.conn.transaction()?;
        let collection = find_collection(&tx, id)?;
        let mut doomed = vec![id];
        doomed.extend(COLLECTIONS.descendant_ids(&tx, &collection.genealogy)?);

        for &victim in &doomed {
            tx.execute("DELETE FROM AgLibraryCollectionImage WHERE collection = ?1", params![victim])?;
            tx.execute("DELETE FROM AgLibraryCollectionContent WHERE collection = ?1", params![victim])?;
            tx.execute("DELETE FROM AgLibraryCollection WHERE id_local = ?1", params![victim])?;
        }
        tx.commit()?;

        tracing::debug!(id, removed = doomed.len(), "deleted collection");
        Ok(doomed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImageInput;
    use chrono::NaiveDate;

    fn catalog_with_images(n: usize) -> (Catalog, Vec<i64>) {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let ids = (0..n)
            .map(|i| {
                let t = NaiveDate::from_ymd_opt(2024, 5, 1)
                    .unwrap()
                    .and_hms_opt(12, 0, i as u32)
                    .unwrap();
                catalog
                    .add_image(&ImageInput::new(format!("/p/img{i}.jpg"), t))
                    .unwrap()
                    .id
            })
            .collect();
        (catalog, ids)
    }

    fn stored_count(catalog: &Catalog, id: i64) -> Option<u32> {
        catalog.collection(id).unwrap().image_count
    }

    #[test]
    fn test_add_collection_genealogy() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let set = catalog.add_collection("Trips", CollectionKind::Group, None).unwrap();
        let rome = catalog
            .add_collection("Rome", CollectionKind::Standard, Some(set.id))
            .unwrap();
        assert_eq!(set.genealogy, set.id.to_string());
        assert_eq!(rome.genealogy, format!("{}/{}", set.id, rome.id));
        assert_eq!(rome.image_count, None);
        assert_eq!(catalog.collection(rome.id).unwrap(), rome);
    }

    #[test]
    fn test_collection_path_levels() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let rome = catalog
            .create_collection_path("Trips/2024/Rome", CollectionKind::Standard)
            .unwrap();
        assert_eq!(rome.kind, CollectionKind::Standard);

        let ancestors = catalog.collection_ancestors(rome.id).unwrap();
        let names: Vec<_> = ancestors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["2024", "Trips"]);
        assert!(ancestors.iter().all(|c| c.kind == CollectionKind::Group));
        assert_eq!(
            rome.genealogy,
            format!("{}/{}/{}", ancestors[1].id, ancestors[0].id, rome.id)
        );

        let again = catalog
            .create_collection_path("trips/2024/ROME", CollectionKind::Standard)
            .unwrap();
        assert_eq!(again.id, rome.id);
        assert_eq!(catalog.collection_count().unwrap(), 3);
    }

    #[test]
    fn test_get_or_create_collection() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let a = catalog
            .get_or_create_collection("Best of", CollectionKind::Standard, None)
            .unwrap();
        let b = catalog
            .get_or_create_collection("best OF", CollectionKind::Standard, None)
            .unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(catalog.collection_count().unwrap(), 1);
        assert_eq!(catalog.collection_by_name("BEST OF").unwrap().unwrap().id, a.id);
        assert!(catalog.collection_by_name("Worst of").unwrap().is_none());

        let summer = catalog
            .get_or_create_collection("Été", CollectionKind::Standard, None)
            .unwrap();
        let shouted = catalog
            .get_or_create_collection("ÉTÉ", CollectionKind::Standard, None)
            .unwrap();
        assert_eq!(summer.id, shouted.id);
        assert_eq!(catalog.collection_count().unwrap(), 2);
        assert_eq!(catalog.collection_by_name("été").unwrap().unwrap().id, summer.id);
    }

    #[test]
    fn test_missing_parent_collection() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let err = catalog
            .add_collection("x", CollectionKind::Standard, Some(12))
            .unwrap_err();
        assert!(matches!(err, Error::ParentNotFound { entity: "collection", id: 12 }));
        assert_eq!(catalog.collection_count().unwrap(), 0);
    }

    #[test]
    fn test_membership_is_idempotent() {
        let (mut catalog, images) = catalog_with_images(1);
        let c = catalog.add_collection("Picks", CollectionKind::Standard, None).unwrap();
        assert!(catalog.add_image_to_collection(c.id, images[0]).unwrap());
        assert!(!catalog.add_image_to_collection(c.id, images[0]).unwrap());
        assert_eq!(stored_count(&catalog, c.id), Some(1));
        assert_eq!(catalog.collection_images(c.id).unwrap().len(), 1);
    }

    #[test]
    fn test_count_after_adds_and_removes() {
        let (mut catalog, images) = catalog_with_images(5);
        let c = catalog.add_collection("Picks", CollectionKind::Standard, None).unwrap();
        for (n, &image) in images.iter().enumerate() {
            catalog.add_image_to_collection(c.id, image).unwrap();
            assert_eq!(stored_count(&catalog, c.id), Some(n as u32 + 1));
        }
        for (m, &image) in images.iter().take(2).enumerate() {
            assert!(catalog.remove_image_from_collection(c.id, image).unwrap());
            assert_eq!(stored_count(&catalog, c.id), Some(5 - m as u32 - 1));
        }
        assert!(!catalog.remove_image_from_collection(c.id, images[0]).unwrap());
        assert_eq!(stored_count(&catalog, c.id), Some(3));
    }

    #[test]
    fn test_collection_order_and_positions() {
        let (mut catalog, images) = catalog_with_images(4);
        let (a, b, c, d) = (images[2], images[0], images[1], images[3]);
        let coll = catalog.add_collection("Story", CollectionKind::Standard, None).unwrap();
        for image in [a, b, c] {
            catalog.add_image_to_collection(coll.id, image).unwrap();
        }
        let order: Vec<_> = catalog
            .collection_images(coll.id)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(order, vec![a, b, c]);

        catalog.remove_image_from_collection(coll.id, b).unwrap();
        catalog.add_image_to_collection(coll.id, d).unwrap();
        let position: f64 = catalog
            .conn
            .query_row(
                "SELECT positionInCollection FROM AgLibraryCollectionImage WHERE image = ?1",
                [d],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(position, 4.0);
        let order: Vec<_> = catalog
            .collection_images(coll.id)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(order, vec![a, c, d]);
    }

    #[test]
    fn test_collection_set_rejects_images() {
        let (mut catalog, images) = catalog_with_images(1);
        let set = catalog.add_collection("Trips", CollectionKind::Group, None).unwrap();
        assert!(matches!(
            catalog.add_image_to_collection(set.id, images[0]),
            Err(Error::CollectionSet(_))
        ));
    }

    #[test]
    fn test_membership_requires_existing_entities() {
        let (mut catalog, images) = catalog_with_images(1);
        let c = catalog.add_collection("Picks", CollectionKind::Standard, None).unwrap();
        assert!(matches!(
            catalog.add_image_to_collection(c.id, 404),
            Err(Error::ImageNotFound(404))
        ));
        assert!(matches!(
            catalog.add_image_to_collection(404, images[0]),
            Err(Error::CollectionNotFound(404))
        ));
    }

    #[test]
    fn test_image_collections() {
        let (mut catalog, images) = catalog_with_images(1);
        let b = catalog.add_collection("B", CollectionKind::Standard, None).unwrap();
        let a = catalog.add_collection("A", CollectionKind::Standard, None).unwrap();
        catalog.add_image_to_collection(b.id, images[0]).unwrap();
        catalog.add_image_to_collection(a.id, images[0]).unwrap();
        let names: Vec<_> = catalog
            .image_collections(images[0])
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_delete_collection_cascades_to_descendants() {
        let (mut catalog, images) = catalog_with_images(2);
        let rome = catalog
            .create_collection_path("Trips/2024/Rome", CollectionKind::Standard)
            .unwrap();
        let keep = catalog.add_collection("Keep", CollectionKind::Standard, None).unwrap();
        catalog.add_image_to_collection(rome.id, images[0]).unwrap();
        catalog.add_image_to_collection(keep.id, images[1]).unwrap();

        let trips = catalog.collection_by_name("Trips").unwrap().unwrap();
        assert_eq!(catalog.delete_collection(trips.id).unwrap(), 3);

        let names: Vec<_> = catalog
            .list_collections()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Keep"]);
        assert_eq!(catalog.collection_images(keep.id).unwrap().len(), 1);
        assert!(catalog.image_collections(images[0]).unwrap().is_empty());
        assert_eq!(catalog.image_count().unwrap(), 2);
        assert!(matches!(
            catalog.delete_collection(trips.id),
            Err(Error::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_list_excludes_system_collections() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        catalog.add_collection("Mine", CollectionKind::Standard, None).unwrap();
        catalog
            .conn
            .execute(
                "INSERT INTO AgLibraryCollection (creationId, name, systemOnly) VALUES ('com.adobe.ag.library.collection', 'Quick Collection', 1)",
                [],
            )
            .unwrap();
        let names: Vec<_> = catalog
            .list_collections()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Mine"]);
        assert!(catalog.collection_by_name("quick collection").unwrap().is_none());
    }
}

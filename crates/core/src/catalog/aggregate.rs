//! Derived collection fields, recomputed after every membership change.

use rusqlite::{params, Connection};

/// Position for the next image appended to a collection: current maximum + 1.
/// Positions are never renumbered, so removals leave gaps.
pub(crate) fn next_position(conn: &Connection, collection_id: i64) -> rusqlite::Result<f64> {
    let max: Option<f64> = conn.query_row(
        "SELECT MAX(positionInCollection) FROM AgLibraryCollectionImage WHERE collection = ?1",
        params![collection_id],
        |row| row.get(0),
    )?;
    Ok(max.unwrap_or(0.0) + 1.0)
}

/// Recount the memberships of a collection and store the result in `imageCount`.
pub(crate) fn refresh_image_count(conn: &Connection, collection_id: i64) -> rusqlite::Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM AgLibraryCollectionImage WHERE collection = ?1",
        params![collection_id],
        |row| row.get(0),
    )?;
    conn.execute(
        "UPDATE AgLibraryCollection SET imageCount = ?1 WHERE id_local = ?2",
        params![count, collection_id],
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema;

    fn conn_with_collection() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        schema::initialize(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO AgLibraryCollection (id_local, creationId, name) VALUES (1, 'com.adobe.ag.library.collection', 'c')",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_first_position_is_one() {
        let conn = conn_with_collection();
        assert_eq!(next_position(&conn, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_position_follows_maximum() {
        let conn = conn_with_collection();
        conn.execute_batch(
            "INSERT INTO AgLibraryCollectionImage (collection, image, positionInCollection) VALUES (1, 10, 1.0);
             INSERT INTO AgLibraryCollectionImage (collection, image, positionInCollection) VALUES (1, 11, 7.5);
             INSERT INTO AgLibraryCollectionImage (collection, image, positionInCollection) VALUES (2, 12, 99.0);",
        )
        .unwrap();
        assert_eq!(next_position(&conn, 1).unwrap(), 8.5);
    }

    #[test]
    fn test_refresh_image_count() {
        let conn = conn_with_collection();
        conn.execute_batch(
            "INSERT INTO AgLibraryCollectionImage (collection, image) VALUES (1, 10);
             INSERT INTO AgLibraryCollectionImage (collection, image) VALUES (1, 11);
             INSERT INTO AgLibraryCollectionImage (collection, image) VALUES (2, 12);",
        )
        .unwrap();
        assert_eq!(refresh_image_count(&conn, 1).unwrap(), 2);
        let stored: i64 = conn
            .query_row("SELECT imageCount FROM AgLibraryCollection WHERE id_local = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(stored, 2);
    }
}

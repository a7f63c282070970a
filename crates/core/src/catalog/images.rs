use chrono::{Local, Timelike, Utc};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::folders::{self, split_file_name, split_file_path};
use super::{new_uuid, Catalog};
use crate::config::RootMatch;
use crate::domain::{ColorLabel, FileFormat, Image, ImageInput, ImportSession, LibraryFile, Pick};
use crate::error::{Error, Result};
use crate::timestamp::{format_capture_time, parse_capture_time, to_lightroom_timestamp};
use crate::xmp;

/// Image columns joined with the owning file so the folder id comes along.
pub(crate) const IMAGE_SELECT: &str = "SELECT i.id_local, i.id_global, i.rootFile, f.folder, i.captureTime,
        i.rating, i.colorLabels, i.pick, i.fileFormat, i.fileWidth, i.fileHeight, i.orientation
     FROM Adobe_images i JOIN AgLibraryFile f ON f.id_local = i.rootFile";

/// Integer column that may hold a real or numeric text in catalogs written elsewhere.
fn lenient_int(row: &Row, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(v) => Some(v),
        ValueRef::Real(v) => Some(v as i64),
        ValueRef::Text(t) => std::str::from_utf8(t).ok().and_then(|s| s.trim().parse().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

fn lenient_text(row: &Row, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        _ => None,
    })
}

pub(crate) fn image_from_row(row: &Row) -> rusqlite::Result<Image> {
    Ok(Image {
        id: row.get(0)?,
        uuid: row.get(1)?,
        file_id: row.get(2)?,
        folder_id: row.get(3)?,
        capture_time: lenient_text(row, 4)?.as_deref().and_then(parse_capture_time),
        rating: lenient_int(row, 5)?.and_then(|v| u8::try_from(v).ok()),
        color_label: lenient_text(row, 6)?.as_deref().and_then(ColorLabel::parse),
        pick: Pick::from_i64(lenient_int(row, 7)?.unwrap_or(0)),
        file_format: FileFormat::parse(lenient_text(row, 8)?.as_deref().unwrap_or_default()),
        width: lenient_int(row, 9)?.and_then(|v| u32::try_from(v).ok()),
        height: lenient_int(row, 10)?.and_then(|v| u32::try_from(v).ok()),
        orientation: lenient_int(row, 11)?.and_then(|v| u8::try_from(v).ok()),
    })
}

fn validate_rating(rating: Option<u8>) -> Result<()> {
    match rating {
        Some(r) if r > 5 => Err(Error::InvalidRating(r)),
        _ => Ok(()),
    }
}

pub(crate) fn ensure_image(conn: &Connection, id: i64) -> Result<()> {
    let exists = conn
        .query_row("SELECT 1 FROM Adobe_images WHERE id_local = ?1", params![id], |_| Ok(()))
        .optional()?;
    exists.ok_or(Error::ImageNotFound(id))
}

fn now_timestamp() -> f64 {
    to_lightroom_timestamp(Utc::now())
}

/// `idx_filename` keeps the on-disk name verbatim, trailing dot included.
fn insert_file(conn: &Connection, folder_id: i64, base_name: &str, extension: &str, file_name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO AgLibraryFile
            (id_global, folder, baseName, extension, originalFilename,
             idx_filename, lc_idx_filename, lc_idx_filenameExtension)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            new_uuid(),
            folder_id,
            base_name,
            extension,
            file_name,
            file_name,
            file_name.to_lowercase(),
            extension.to_lowercase(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// File record, image record and an empty metadata row for one input.
fn insert_image(conn: &Connection, input: &ImageInput, policy: RootMatch) -> Result<Image> {
    validate_rating(input.rating)?;
    let path = input.path.to_string_lossy();
    let (dir, file_name) = split_file_path(&path);
    let (base_name, extension) = split_file_name(&file_name);
    let (_, folder) = folders::resolve_directory(conn, &dir, policy)?;
    let file_format = input
        .file_format
        .unwrap_or_else(|| FileFormat::from_extension(extension));

    let file_id = insert_file(conn, folder.id, base_name, extension, &file_name)?;

    let uuid = new_uuid();
    conn.execute(
        "INSERT INTO Adobe_images
            (id_global, rootFile, captureTime, rating, colorLabels, pick,
             fileFormat, fileWidth, fileHeight, orientation, touchTime)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            uuid,
            file_id,
            format_capture_time(input.capture_time),
            input.rating,
            input.color_label.map(|l| l.as_str()).unwrap_or_default(),
            input.pick.as_i64(),
            file_format.as_str(),
            input.width,
            input.height,
            input.orientation,
            now_timestamp(),
        ],
    )?;
    let id = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO Adobe_AdditionalMetadata (id_global, image, isRawFile, xmp) VALUES (?1, ?2, ?3, '')",
        params![new_uuid(), id, file_format == FileFormat::Raw],
    )?;
    tracing::debug!(id, path = %path, format = %file_format, "added image");

    Ok(Image {
        id,
        uuid,
        file_id,
        folder_id: folder.id,
        capture_time: Some(input.capture_time.with_nanosecond(0).unwrap_or(input.capture_time)),
        rating: input.rating,
        color_label: input.color_label,
        pick: input.pick,
        file_format,
        width: input.width,
        height: input.height,
        orientation: input.orientation,
    })
}

fn import_session_from_row(row: &Row) -> rusqlite::Result<ImportSession> {
    let image_count: Option<i64> = lenient_int(row, 1)?;
    Ok(ImportSession {
        id: row.get(0)?,
        image_count: image_count.unwrap_or(0).max(0) as usize,
        import_date: lenient_text(row, 2)?
            .as_deref()
            .and_then(parse_capture_time)
            .unwrap_or_default(),
        name: row.get(3)?,
    })
}

impl Catalog {
    /// Add a single image, creating its root folder and folder as needed.
    pub fn add_image(&mut self, input: &ImageInput) -> Result<Image> {
        self.ensure_writable()?;
        let policy = self.options.root_match;
        let tx = self.conn.transaction()?;
        let image = insert_image(&tx, input, policy)?;
        tx.commit()?;
        Ok(image)
    }

    /// Add a batch of images as one import session. All or nothing.
    pub fn add_images(&mut self, inputs: &[ImageInput]) -> Result<(ImportSession, Vec<Image>)> {
        self.ensure_writable()?;
        if inputs.is_empty() {
            return Err(Error::EmptyImport);
        }
        let policy = self.options.root_match;
        let import_date = Local::now().naive_local();
        let import_date = import_date.with_nanosecond(0).unwrap_or(import_date);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO AgLibraryImport (importDate, imageCount) VALUES (?1, ?2)",
            params![format_capture_time(import_date), inputs.len() as i64],
        )?;
        let import_id = tx.last_insert_rowid();

        let mut images = Vec::with_capacity(inputs.len());
        for input in inputs {
            let image = insert_image(&tx, input, policy)?;
            tx.execute(
                "INSERT INTO AgLibraryImportImage (image, import) VALUES (?1, ?2)",
                params![image.id, import_id],
            )?;
            images.push(image);
        }
        tx.commit()?;

        tracing::debug!(import = import_id, images = images.len(), "committed import session");
        let session = ImportSession {
            id: import_id,
            import_date,
            image_count: images.len(),
            name: None,
        };
        Ok((session, images))
    }

    pub fn image(&self, id: i64) -> Result<Image> {
        self.conn
            .query_row(&format!("{IMAGE_SELECT} WHERE i.id_local = ?1"), params![id], image_from_row)
            .optional()?
            .ok_or(Error::ImageNotFound(id))
    }

    /// Every image, oldest capture first.
    pub fn list_images(&self) -> Result<Vec<Image>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{IMAGE_SELECT} ORDER BY i.captureTime, i.id_local"))?;
        let images = stmt
            .query_map([], image_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(images)
    }

    /// The file record behind an image.
    pub fn image_file(&self, image_id: i64) -> Result<LibraryFile> {
        self.conn
            .query_row(
                "SELECT f.id_local, f.id_global, f.folder, f.baseName, f.extension, f.originalFilename
                 FROM AgLibraryFile f JOIN Adobe_images i ON i.rootFile = f.id_local
                 WHERE i.id_local = ?1",
                params![image_id],
                |row| {
                    Ok(LibraryFile {
                        id: row.get(0)?,
                        uuid: row.get(1)?,
                        folder_id: row.get(2)?,
                        base_name: row.get(3)?,
                        extension: row.get(4)?,
                        original_filename: row.get(5)?,
                    })
                },
            )
            .optional()?
            .ok_or(Error::ImageNotFound(image_id))
    }

    /// Absolute path of an image, reassembled from root folder, folder and file name.
    pub fn image_path(&self, image_id: i64) -> Result<String> {
        self.conn
            .query_row(
                "SELECT rf.absolutePath || fo.pathFromRoot || f.idx_filename
                 FROM Adobe_images i
                 JOIN AgLibraryFile f ON f.id_local = i.rootFile
                 JOIN AgLibraryFolder fo ON fo.id_local = f.folder
                 JOIN AgLibraryRootFolder rf ON rf.id_local = fo.rootFolder
                 WHERE i.id_local = ?1",
                params![image_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(Error::ImageNotFound(image_id))
    }

    /// Whether a file at exactly this (normalized) path is already cataloged.
    pub fn image_exists(&self, path: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM AgLibraryFile f
             JOIN AgLibraryFolder fo ON fo.id_local = f.folder
             JOIN AgLibraryRootFolder rf ON rf.id_local = fo.rootFolder
             WHERE rf.absolutePath || fo.pathFromRoot || f.idx_filename = ?1",
            params![folders::normalize_path(path)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn set_rating(&self, image_id: i64, rating: Option<u8>) -> Result<()> {
        validate_rating(rating)?;
        self.update_image(image_id, "rating", Value::from(rating.map(i64::from)))
    }

    pub fn set_color_label(&self, image_id: i64, label: Option<ColorLabel>) -> Result<()> {
        let stored = label.map(|l| l.as_str()).unwrap_or_default().to_string();
        self.update_image(image_id, "colorLabels", Value::Text(stored))
    }

    pub fn set_pick(&self, image_id: i64, pick: Pick) -> Result<()> {
        self.update_image(image_id, "pick", Value::Integer(pick.as_i64()))
    }

    fn update_image(&self, image_id: i64, column: &'static str, value: Value) -> Result<()> {
        self.ensure_writable()?;
        let updated = self.conn.execute(
            &format!("UPDATE Adobe_images SET {column} = ?1, touchTime = ?2 WHERE id_local = ?3"),
            params![value, now_timestamp(), image_id],
        )?;
        if updated == 0 {
            return Err(Error::ImageNotFound(image_id));
        }
        Ok(())
    }

    /// Replace the XMP packet of an image. Empty text clears it.
    pub fn set_xmp(&self, image_id: i64, text: &str) -> Result<()> {
        self.ensure_writable()?;
        ensure_image(&self.conn, image_id)?;
        // the column is NOT NULL, so "no blob" is stored as ''
        let value = match xmp::encode(text)? {
            Some(blob) => Value::Blob(blob),
            None => Value::Text(String::new()),
        };
        let updated = self.conn.execute(
            "UPDATE Adobe_AdditionalMetadata SET xmp = ?1 WHERE image = ?2",
            params![value, image_id],
        )?;
        if updated == 0 {
            self.conn.execute(
                "INSERT INTO Adobe_AdditionalMetadata (id_global, image, xmp) VALUES (?1, ?2, ?3)",
                params![new_uuid(), image_id, value],
            )?;
        }
        Ok(())
    }

    /// The decoded XMP packet of an image, empty when none is stored.
    pub fn xmp(&self, image_id: i64) -> Result<String> {
        ensure_image(&self.conn, image_id)?;
        let blob: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT xmp FROM Adobe_AdditionalMetadata WHERE image = ?1 ORDER BY id_local LIMIT 1",
                params![image_id],
                |row| {
                    Ok(match row.get_ref(0)? {
                        ValueRef::Blob(b) | ValueRef::Text(b) => b.to_vec(),
                        ValueRef::Null | ValueRef::Integer(_) | ValueRef::Real(_) => Vec::new(),
                    })
                },
            )
            .optional()?;
        match blob {
            Some(bytes) => xmp::decode(&bytes),
            None => Ok(String::new()),
        }
    }

    pub fn import_sessions(&self) -> Result<Vec<ImportSession>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id_local, imageCount, importDate, name FROM AgLibraryImport ORDER BY id_local")?;
        let sessions = stmt
            .query_map([], import_session_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogOptions;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn count(catalog: &Catalog, table: &str) -> i64 {
        catalog
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_add_image_records() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let mut input = ImageInput::new("/photos/2024/IMG_0001.CR2", at(15, 10));
        input.rating = Some(4);
        input.color_label = Some(ColorLabel::Green);
        input.pick = Pick::Picked;
        input.width = Some(6000);
        input.height = Some(4000);
        input.orientation = Some(1);

        let image = catalog.add_image(&input).unwrap();
        assert_eq!(image.file_format, FileFormat::Raw);
        assert_eq!(catalog.image(image.id).unwrap(), image);
        assert_eq!(catalog.image_path(image.id).unwrap(), "/photos/2024/IMG_0001.CR2");

        let file = catalog.image_file(image.id).unwrap();
        assert_eq!(file.base_name, "IMG_0001");
        assert_eq!(file.extension, "CR2");
        assert_eq!(file.original_filename, "IMG_0001.CR2");
        assert_eq!(file.folder_id, image.folder_id);

        assert_eq!(count(&catalog, "Adobe_AdditionalMetadata"), 1);
        let lc: (String, String) = catalog
            .conn
            .query_row(
                "SELECT lc_idx_filename, lc_idx_filenameExtension FROM AgLibraryFile",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(lc, ("img_0001.cr2".to_string(), "cr2".to_string()));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let image = catalog
            .add_image(&ImageInput::new("/p/a.jpg", at(1, 0)))
            .unwrap();
        let stored = catalog.image(image.id).unwrap();
        assert_eq!(stored.rating, None);
        assert_eq!(stored.width, None);
        assert_eq!(stored.orientation, None);
        assert_eq!(stored.color_label, None);
        assert_eq!(stored.pick, Pick::Unflagged);
        let rating_is_null: bool = catalog
            .conn
            .query_row("SELECT rating IS NULL FROM Adobe_images", [], |r| r.get(0))
            .unwrap();
        assert!(rating_is_null);
    }

    #[test]
    fn test_second_image_reuses_root_and_folder() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let first = catalog
            .add_image(&ImageInput::new("/a/b/c/file.jpg", at(1, 0)))
            .unwrap();
        let roots = catalog.list_root_folders().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].absolute_path, "/a/b/c/");
        let folders = catalog.list_folders(roots[0].id).unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].path_from_root, "");

        let second = catalog
            .add_image(&ImageInput::new("/a/b/c/other.jpg", at(1, 1)))
            .unwrap();
        assert_eq!(second.folder_id, first.folder_id);
        assert_eq!(catalog.root_folder_count().unwrap(), 1);
        assert_eq!(catalog.folder_count().unwrap(), 1);
    }

    #[test]
    fn test_explicit_format_wins() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let mut input = ImageInput::new("/p/scan.xyz", at(1, 0));
        assert_eq!(catalog.add_image(&input).unwrap().file_format, FileFormat::Jpg);
        input.path = "/p/scan2.xyz".into();
        input.file_format = Some(FileFormat::Tiff);
        assert_eq!(catalog.add_image(&input).unwrap().file_format, FileFormat::Tiff);
    }

    #[test]
    fn test_invalid_rating_writes_nothing() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let mut input = ImageInput::new("/p/a.jpg", at(1, 0));
        input.rating = Some(6);
        assert!(matches!(catalog.add_image(&input), Err(Error::InvalidRating(6))));
        assert_eq!(catalog.image_count().unwrap(), 0);
        assert_eq!(catalog.root_folder_count().unwrap(), 0);
    }

    #[test]
    fn test_add_images_creates_import_session() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let inputs = vec![
            ImageInput::new("/p/a.jpg", at(2, 0)),
            ImageInput::new("/p/sub/b.nef", at(1, 0)),
            ImageInput::new("/q/c.png", at(3, 0)),
        ];
        let (session, images) = catalog.add_images(&inputs).unwrap();
        assert_eq!(session.image_count, 3);
        assert_eq!(images.len(), 3);
        assert_eq!(count(&catalog, "AgLibraryImportImage"), 3);
        assert_eq!(catalog.root_folder_count().unwrap(), 2);

        let sessions = catalog.import_sessions().unwrap();
        assert_eq!(sessions, vec![session]);

        let captured: Vec<_> = catalog
            .list_images()
            .unwrap()
            .into_iter()
            .map(|i| i.capture_time.unwrap())
            .collect();
        assert_eq!(captured, vec![at(1, 0), at(2, 0), at(3, 0)]);
    }

    #[test]
    fn test_add_images_is_atomic() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let mut bad = ImageInput::new("/q/bad.jpg", at(1, 0));
        bad.rating = Some(9);
        let inputs = vec![ImageInput::new("/p/good.jpg", at(1, 0)), bad];
        assert!(catalog.add_images(&inputs).is_err());
        assert_eq!(catalog.image_count().unwrap(), 0);
        assert_eq!(catalog.root_folder_count().unwrap(), 0);
        assert_eq!(count(&catalog, "AgLibraryImport"), 0);
    }

    #[test]
    fn test_add_images_empty() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        assert!(matches!(catalog.add_images(&[]), Err(Error::EmptyImport)));
    }

    #[test]
    fn test_image_exists_exact_path() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        catalog
            .add_image(&ImageInput::new("/photos/2024/a.jpg", at(1, 0)))
            .unwrap();
        assert!(catalog.image_exists("/photos/2024/a.jpg").unwrap());
        assert!(catalog.image_exists("/photos//2024/a.jpg").unwrap());
        assert!(!catalog.image_exists("/elsewhere/a.jpg").unwrap());
        assert!(!catalog.image_exists("/photos/2024/a.JPG").unwrap());
    }

    #[test]
    fn test_trailing_dot_name_keeps_its_path() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let image = catalog
            .add_image(&ImageInput::new("/photos/scan.", at(1, 0)))
            .unwrap();
        let file = catalog.image_file(image.id).unwrap();
        assert_eq!((file.base_name.as_str(), file.extension.as_str()), ("scan", ""));
        assert_eq!(file.original_filename, "scan.");
        assert_eq!(catalog.image_path(image.id).unwrap(), "/photos/scan.");
        assert!(catalog.image_exists("/photos/scan.").unwrap());
        assert!(!catalog.image_exists("/photos/scan").unwrap());
    }

    #[test]
    fn test_setters() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let image = catalog.add_image(&ImageInput::new("/p/a.jpg", at(1, 0))).unwrap();

        catalog.set_rating(image.id, Some(5)).unwrap();
        catalog.set_color_label(image.id, Some(ColorLabel::Purple)).unwrap();
        catalog.set_pick(image.id, Pick::Rejected).unwrap();
        let stored = catalog.image(image.id).unwrap();
        assert_eq!(stored.rating, Some(5));
        assert_eq!(stored.color_label, Some(ColorLabel::Purple));
        assert_eq!(stored.pick, Pick::Rejected);

        catalog.set_rating(image.id, None).unwrap();
        catalog.set_color_label(image.id, None).unwrap();
        let stored = catalog.image(image.id).unwrap();
        assert_eq!(stored.rating, None);
        assert_eq!(stored.color_label, None);

        assert!(matches!(catalog.set_rating(image.id, Some(7)), Err(Error::InvalidRating(7))));
        assert!(matches!(catalog.set_pick(999, Pick::Picked), Err(Error::ImageNotFound(999))));
        assert!(matches!(catalog.image(999), Err(Error::ImageNotFound(999))));
    }

    #[test]
    fn test_xmp_roundtrip_through_catalog() {
        let mut catalog = Catalog::open_in_memory().unwrap();
        let image = catalog.add_image(&ImageInput::new("/p/a.jpg", at(1, 0))).unwrap();
        assert_eq!(catalog.xmp(image.id).unwrap(), "");

        let packet = xmp::generate_basic(Some(3), Some(ColorLabel::Blue), Some("2024-01-01T00:30:00"));
        catalog.set_xmp(image.id, &packet).unwrap();
        assert_eq!(catalog.xmp(image.id).unwrap(), packet);

        let stored: Vec<u8> = catalog
            .conn
            .query_row("SELECT xmp FROM Adobe_AdditionalMetadata WHERE image = ?1", [image.id], |r| r.get(0))
            .unwrap();
        assert_eq!(xmp::declared_len(&stored), Some(packet.len() as u32));

        catalog.set_xmp(image.id, "").unwrap();
        assert_eq!(catalog.xmp(image.id).unwrap(), "");
        assert_eq!(count(&catalog, "Adobe_AdditionalMetadata"), 1);
        assert!(matches!(catalog.xmp(42), Err(Error::ImageNotFound(42))));
    }

    #[test]
    fn test_read_only_rejects_image_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("c.lrcat");
        let image_id = {
            let mut catalog = Catalog::create(&path, CatalogOptions::default()).unwrap();
            catalog.add_image(&ImageInput::new("/p/a.jpg", at(1, 0))).unwrap().id
        };
        let mut catalog = Catalog::open(&path, CatalogOptions::read_only()).unwrap();
        assert!(matches!(
            catalog.add_image(&ImageInput::new("/p/b.jpg", at(1, 0))),
            Err(Error::ReadOnly)
        ));
        assert!(matches!(catalog.set_rating(image_id, Some(1)), Err(Error::ReadOnly)));
        assert_eq!(catalog.image(image_id).unwrap().id, image_id);
    }
}

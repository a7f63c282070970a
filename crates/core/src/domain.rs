use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Lightroom's coarse file format tag stored in `Adobe_images.fileFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileFormat {
    Jpg,
    Png,
    Tiff,
    Psd,
    Dng,
    Raw,
    Video,
}

const RAW_EXTENSIONS: &[&str] = &["cr2", "cr3", "nef", "arw", "orf", "raf", "rw2", "pef", "srw"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Jpg => "JPG",
            FileFormat::Png => "PNG",
            FileFormat::Tiff => "TIFF",
            FileFormat::Psd => "PSD",
            FileFormat::Dng => "DNG",
            FileFormat::Raw => "RAW",
            FileFormat::Video => "VIDEO",
        }
    }

    /// Parse a stored format tag. Unknown tags fall back to `Jpg`.
    pub fn parse(s: &str) -> Self {
        match s {
            "PNG" => FileFormat::Png,
            "TIFF" => FileFormat::Tiff,
            "PSD" => FileFormat::Psd,
            "DNG" => FileFormat::Dng,
            "RAW" => FileFormat::Raw,
            "VIDEO" => FileFormat::Video,
            _ => FileFormat::Jpg,
        }
    }

    /// Classify a file extension (without the dot, any case).
    /// Unrecognized extensions are treated as JPEG rather than rejected.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => FileFormat::Jpg,
            "png" => FileFormat::Png,
            "tif" | "tiff" => FileFormat::Tiff,
            "psd" => FileFormat::Psd,
            "dng" => FileFormat::Dng,
            e if RAW_EXTENSIONS.contains(&e) => FileFormat::Raw,
            e if VIDEO_EXTENSIONS.contains(&e) => FileFormat::Video,
            _ => FileFormat::Jpg,
        }
    }

    /// Whether the directory scanner should pick up files with this extension.
    /// `mkv` classifies as video but is not imported.
    pub fn is_supported_extension(ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        matches!(
            ext.as_str(),
            "jpg" | "jpeg" | "png" | "tif" | "tiff" | "psd" | "dng" | "mp4" | "mov" | "avi"
        ) || RAW_EXTENSIONS.contains(&ext.as_str())
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flag state of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Pick {
    Rejected,
    #[default]
    Unflagged,
    Picked,
}

impl Pick {
    pub fn as_i64(&self) -> i64 {
        match self {
            Pick::Rejected => -1,
            Pick::Unflagged => 0,
            Pick::Picked => 1,
        }
    }

    pub fn from_i64(v: i64) -> Self {
        match v {
            v if v < 0 => Pick::Rejected,
            0 => Pick::Unflagged,
            _ => Pick::Picked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorLabel {
    Red,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl ColorLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorLabel::Red => "Red",
            ColorLabel::Yellow => "Yellow",
            ColorLabel::Green => "Green",
            ColorLabel::Blue => "Blue",
            ColorLabel::Purple => "Purple",
        }
    }

    /// Case-insensitive; anything outside the vocabulary (including "") is no label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Some(ColorLabel::Red),
            "yellow" => Some(ColorLabel::Yellow),
            "green" => Some(ColorLabel::Green),
            "blue" => Some(ColorLabel::Blue),
            "purple" => Some(ColorLabel::Purple),
            _ => None,
        }
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collection flavour, stored as the `creationId` of `AgLibraryCollection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CollectionKind {
    #[default]
    Standard,
    Smart,
    /// A collection set: holds other collections, never images.
    Group,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Standard => "com.adobe.ag.library.collection",
            CollectionKind::Smart => "com.adobe.ag.library.smart_collection",
            CollectionKind::Group => "com.adobe.ag.library.group",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "com.adobe.ag.library.smart_collection" => CollectionKind::Smart,
            "com.adobe.ag.library.group" => CollectionKind::Group,
            _ => CollectionKind::Standard,
        }
    }
}

/// A canonical absolute directory from which folder paths are measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootFolder {
    pub id: i64,
    pub uuid: String,
    /// Forward slashes, always ends with `/`.
    pub absolute_path: String,
    pub name: String,
}

/// A folder below a root folder. Depth lives in `path_from_root`, not in `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Folder {
    pub id: i64,
    pub uuid: String,
    pub root_folder_id: i64,
    pub parent_id: Option<i64>,
    /// Empty for the root itself, otherwise ends with `/`.
    pub path_from_root: String,
}

/// A row of `AgLibraryFile`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryFile {
    pub id: i64,
    pub uuid: String,
    pub folder_id: i64,
    pub base_name: String,
    pub extension: String,
    pub original_filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub id: i64,
    pub uuid: String,
    pub file_id: i64,
    pub folder_id: i64,
    pub capture_time: Option<NaiveDateTime>,
    pub rating: Option<u8>,
    pub color_label: Option<ColorLabel>,
    pub pick: Pick,
    pub file_format: FileFormat,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub orientation: Option<u8>,
}

/// Everything needed to add one image to a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    /// Absolute path of the image file.
    pub path: PathBuf,
    pub capture_time: NaiveDateTime,
    pub rating: Option<u8>,
    pub color_label: Option<ColorLabel>,
    pub pick: Pick,
    /// Detected from the extension when `None`.
    pub file_format: Option<FileFormat>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub orientation: Option<u8>,
}

impl ImageInput {
    pub fn new(path: impl Into<PathBuf>, capture_time: NaiveDateTime) -> Self {
        Self {
            path: path.into(),
            capture_time,
            rating: None,
            color_label: None,
            pick: Pick::Unflagged,
            file_format: None,
            width: None,
            height: None,
            orientation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSession {
    pub id: i64,
    pub import_date: NaiveDateTime,
    pub image_count: usize,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub lc_name: String,
    pub parent_id: Option<i64>,
    /// Slash-joined ids from the topmost ancestor down to this keyword.
    pub genealogy: String,
    pub include_on_export: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub kind: CollectionKind,
    pub parent_id: Option<i64>,
    pub genealogy: String,
    /// `None` until the first membership change.
    pub image_count: Option<u32>,
}

/// Summary counts for a catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub db_version: String,
    pub root_folders: usize,
    pub folders: usize,
    pub images: usize,
    pub keywords: usize,
    pub collections: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_extensions_classify_as_raw() {
        assert_eq!(FileFormat::from_extension("cr2"), FileFormat::Raw);
        assert_eq!(FileFormat::from_extension("NEF"), FileFormat::Raw);
        assert_eq!(FileFormat::from_extension("srw"), FileFormat::Raw);
    }

    #[test]
    fn test_unknown_extension_falls_back_to_jpg() {
        assert_eq!(FileFormat::from_extension("xyz"), FileFormat::Jpg);
        assert_eq!(FileFormat::from_extension(""), FileFormat::Jpg);
    }

    #[test]
    fn test_format_tag_roundtrip() {
        for format in [
            FileFormat::Jpg,
            FileFormat::Png,
            FileFormat::Tiff,
            FileFormat::Psd,
            FileFormat::Dng,
            FileFormat::Raw,
            FileFormat::Video,
        ] {
            assert_eq!(FileFormat::parse(format.as_str()), format);
        }
    }

    #[test]
    fn test_supported_extensions() {
        assert!(FileFormat::is_supported_extension("JPG"));
        assert!(FileFormat::is_supported_extension("arw"));
        assert!(FileFormat::is_supported_extension("mov"));
        assert!(!FileFormat::is_supported_extension("mkv"));
        assert!(!FileFormat::is_supported_extension("txt"));
    }

    #[test]
    fn test_pick_values() {
        assert_eq!(Pick::from_i64(-1), Pick::Rejected);
        assert_eq!(Pick::from_i64(0), Pick::Unflagged);
        assert_eq!(Pick::from_i64(1), Pick::Picked);
        assert_eq!(Pick::Rejected.as_i64(), -1);
    }

    #[test]
    fn test_color_label_parse() {
        assert_eq!(ColorLabel::parse("red"), Some(ColorLabel::Red));
        assert_eq!(ColorLabel::parse("Purple"), Some(ColorLabel::Purple));
        assert_eq!(ColorLabel::parse(""), None);
        assert_eq!(ColorLabel::parse("Orange"), None);
    }

    #[test]
    fn test_collection_kind_roundtrip() {
        for kind in [CollectionKind::Standard, CollectionKind::Smart, CollectionKind::Group] {
            assert_eq!(CollectionKind::parse(kind.as_str()), kind);
        }
    }
}

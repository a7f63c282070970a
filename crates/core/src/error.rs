use std::path::PathBuf;

use rusqlite::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid options file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("catalog does not exist: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("catalog is open read-only")]
    ReadOnly,

    #[error("root folder not found: {0}")]
    RootFolderNotFound(i64),

    #[error("folder not found: {0}")]
    FolderNotFound(i64),

    #[error("image not found: {0}")]
    ImageNotFound(i64),

    #[error("keyword not found: {0}")]
    KeywordNotFound(i64),

    #[error("collection not found: {0}")]
    CollectionNotFound(i64),

    #[error("parent {entity} not found: {id}")]
    ParentNotFound { entity: &'static str, id: i64 },

    #[error("root folder already registered: {0}")]
    RootFolderExists(String),

    #[error("folder {path:?} already exists under root folder {root}")]
    FolderExists { root: i64, path: String },

    #[error("collection {0} is a collection set and cannot hold images")]
    CollectionSet(i64),

    #[error("rating must be between 0 and 5, got {0}")]
    InvalidRating(u8),

    #[error("no images to add")]
    EmptyImport,

    #[error("hierarchy path has no names: {0:?}")]
    EmptyHierarchyPath(String),

    #[error("malformed XMP blob: {0}")]
    MalformedBlob(String),

    #[error("XMP payload of {0} bytes does not fit the length header")]
    BlobTooLarge(usize),
}

/// Coarse classification used by callers that only care about the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Malformed,
    Invalid,
    Persistence,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CatalogNotFound(_)
            | Error::DirectoryNotFound(_)
            | Error::RootFolderNotFound(_)
            | Error::FolderNotFound(_)
            | Error::ImageNotFound(_)
            | Error::KeywordNotFound(_)
            | Error::CollectionNotFound(_)
            | Error::ParentNotFound { .. } => ErrorKind::NotFound,
            Error::RootFolderExists(_) | Error::FolderExists { .. } => ErrorKind::Conflict,
            Error::Database(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
                ErrorKind::Conflict
            }
            Error::MalformedBlob(_) => ErrorKind::Malformed,
            Error::ReadOnly
            | Error::NotADirectory(_)
            | Error::CollectionSet(_)
            | Error::InvalidRating(_)
            | Error::EmptyImport
            | Error::EmptyHierarchyPath(_)
            | Error::BlobTooLarge(_) => ErrorKind::Invalid,
            Error::Database(_) | Error::Io(_) | Error::Config(_) => ErrorKind::Persistence,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

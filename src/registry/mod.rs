//! Folder registry: the authoritative store of the folder/file hierarchy
//!
//! Every operation is addressed by an absolute [`FolderPath`] resolved from
//! the root. The registry stores Telegram `file_id` handles, never file
//! bytes, and is the one durable piece of state in the system.

pub mod migrations;
pub mod path;
pub mod store;

use thiserror::Error;

pub use path::{validate_name, FolderPath, ROOT_DISPLAY_NAME};
pub use store::{create_pool, DbConnection, DbPool, FolderRegistry};

/// Errors produced by registry operations
///
/// `NotFound` is split by entity so handlers can phrase the notice
/// correctly; everything storage-related collapses into `Storage`/`Pool`.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("folder not found: {0}")]
    FolderNotFound(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("storage pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

/// Category tag for a stored file, used only to pick the send method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Photo,
    Video,
    Audio,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Photo => "photo",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
        }
    }

    /// Decodes a stored tag; unknown values fall back to `Document`
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "photo" => FileKind::Photo,
            "video" => FileKind::Video,
            "audio" => FileKind::Audio,
            _ => FileKind::Document,
        }
    }

    /// Extension appended to generated fallback filenames
    pub fn default_extension(self) -> &'static str {
        match self {
            FileKind::Document => "",
            FileKind::Photo => ".jpg",
            FileKind::Video => ".mp4",
            FileKind::Audio => ".mp3",
        }
    }
}

/// A stored file reference: display name plus the opaque transport handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub filename: String,
    pub file_id: String,
    pub kind: FileKind,
}

/// Direct children of one folder, both lists sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderListing {
    pub subfolders: Vec<String>,
    pub files: Vec<FileRef>,
}

/// Aggregate counts across the whole tree; the root folder is not counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub folders: u64,
    pub files: u64,
}

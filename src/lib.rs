//! Teleshelf - Telegram bot serving a folder tree of shared files
//!
//! A single configured administrator organizes transport-stored files into
//! nested folders; everyone else browses and downloads them through inline
//! keyboards. Only `file_id` handles are stored, never file bytes.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `registry`: the durable folder/file hierarchy (SQLite-backed)
//! - `session`: per-user navigation state (ephemeral)
//! - `telegram`: bot transport, menus, and handlers

pub mod cli;
pub mod core;
pub mod registry;
pub mod session;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{AppError, AppResult};
pub use registry::{FolderPath, FolderRegistry, RegistryError};
pub use session::{InMemorySessions, NavigationState, SessionStore};
pub use telegram::{schema, HandlerDeps};

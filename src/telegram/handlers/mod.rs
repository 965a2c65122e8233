//! Update handlers: commands, callbacks, pending-action inputs

pub mod callbacks;
pub mod commands;
pub mod messages;
pub mod schema;
pub mod types;

pub use schema::schema;
pub use types::{resolve_role, HandlerDeps, HandlerError};

use crate::registry::RegistryError;

/// Maps a registry error to the short notice shown to the user
///
/// Every registry error is recovered here; storage failures are logged
/// with detail for the operator and surfaced generically.
pub fn user_notice(err: &RegistryError) -> String {
    match err {
        RegistryError::FolderNotFound(_) => "❌ Folder not found".to_string(),
        RegistryError::FileNotFound(_) => "❌ File not found".to_string(),
        RegistryError::AlreadyExists(name) => format!("⚠️ '{}' already exists.", name),
        RegistryError::InvalidName(reason) => format!("⚠️ Invalid name: {}.", reason),
        RegistryError::Storage(e) => {
            log::error!("Storage failure: {}", e);
            "❌ Something went wrong, try again later.".to_string()
        }
        RegistryError::Pool(e) => {
            log::error!("Connection pool failure: {}", e);
            "❌ Something went wrong, try again later.".to_string()
        }
    }
}

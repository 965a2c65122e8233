//! Handler types and dependencies

use std::sync::Arc;

use crate::core::config;
use crate::registry::FolderRegistry;
use crate::session::SessionStore;
use crate::telegram::menu::Role;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub registry: Arc<FolderRegistry>,
    pub sessions: Arc<dyn SessionStore>,
}

impl HandlerDeps {
    pub fn new(registry: Arc<FolderRegistry>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { registry, sessions }
    }
}

/// The single capability check: performed once at dispatch time, the
/// resulting role flows into navigation and rendering
pub fn resolve_role(username: Option<&str>) -> Role {
    role_for(config::ADMIN_USERNAME.as_deref(), username)
}

/// Telegram usernames are case-insensitive
fn role_for(admin: Option<&str>, username: Option<&str>) -> Role {
    match (admin, username) {
        (Some(admin), Some(user)) if admin.eq_ignore_ascii_case(user) => Role::Admin,
        _ => Role::User,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn admin_match_is_case_insensitive() {
        assert_eq!(role_for(Some("Archivist"), Some("archivist")), Role::Admin);
        assert_eq!(role_for(Some("archivist"), Some("ARCHIVIST")), Role::Admin);
        assert_eq!(role_for(Some("archivist"), Some("someone")), Role::User);
    }

    #[test]
    fn missing_identity_on_either_side_is_never_admin() {
        assert_eq!(role_for(Some("archivist"), None), Role::User);
        assert_eq!(role_for(None, Some("archivist")), Role::User);
        assert_eq!(role_for(None, None), Role::User);
    }

    // ADMIN_USERNAME is a process-wide Lazy, so the env-backed wrapper is
    // only exercised on the "no admin configured" branch deterministically.
    #[test]
    #[serial]
    fn unknown_user_is_never_admin_without_config() {
        if config::ADMIN_USERNAME.is_none() {
            assert_eq!(resolve_role(Some("someone")), Role::User);
            assert_eq!(resolve_role(None), Role::User);
        }
    }
}

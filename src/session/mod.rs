//! Per-user navigation state
//!
//! Each user has a cursor (their current path) plus at most one pending
//! admin action. State is ephemeral: created on first contact, reset on
//! /start, never persisted. Losing it only puts the user back at the root.

use dashmap::DashMap;

use crate::registry::{FolderPath, FolderRegistry, RegistryError};

/// One-shot flag: the next matching input from the admin is consumed as the
/// argument of a previously initiated operation, then the flag clears.
/// Success or failure, there is no retry loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PendingAction {
    #[default]
    None,
    /// Waiting for a text message carrying the new folder's name
    AwaitingFolderName { target: FolderPath },
    /// Waiting for a media message to file into `target`
    AwaitingUpload { target: FolderPath },
}

/// Navigation cursor plus pending-action flag for one user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current: FolderPath,
    pub pending: PendingAction,
    /// Names behind indexed callback refs, captured when the user's menu
    /// was last rendered; overwritten on every render
    pub menu_refs: Vec<String>,
}

impl NavigationState {
    /// Back to the root, dropping any pending action and captured refs
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Descends into a direct subfolder, validated against the live registry
    ///
    /// The check happens at transition time rather than against a cached
    /// listing: a concurrent admin delete must leave the user where they
    /// are with a "not found" signal, not inside a ghost folder.
    pub fn open_folder(&mut self, registry: &FolderRegistry, name: &str) -> Result<(), RegistryError> {
        let candidate = self.current.child(name)?;
        registry.list_children(&candidate)?;
        self.current = candidate;
        Ok(())
    }

    /// Pops one segment; a no-op at the root
    pub fn go_back(&mut self) {
        self.current = self.current.parent();
    }

    /// Arms the create-folder flow, capturing the current path as target
    pub fn begin_create_folder(&mut self) {
        self.pending = PendingAction::AwaitingFolderName {
            target: self.current.clone(),
        };
    }

    /// Arms the upload flow, capturing the current path as target
    pub fn begin_upload(&mut self) {
        self.pending = PendingAction::AwaitingUpload {
            target: self.current.clone(),
        };
    }

    /// Consumes the pending action, leaving `None` behind
    pub fn take_pending(&mut self) -> PendingAction {
        std::mem::take(&mut self.pending)
    }
}

/// Process-wide session store keyed by user identity
///
/// Behind a trait so call sites don't care whether sessions live in a local
/// map or, some day, a shared cache. Same-user races are last-write-wins;
/// the registry, not the session, is the source of truth for the tree.
pub trait SessionStore: Send + Sync {
    /// Returns the user's state, creating a fresh root-positioned one on
    /// first contact
    fn load(&self, user_id: i64) -> NavigationState;

    fn store(&self, user_id: i64, state: NavigationState);

    /// Drops the session entirely (equivalent to a fresh first contact)
    fn reset(&self, user_id: i64);
}

/// In-memory session store on a concurrent map
#[derive(Default)]
pub struct InMemorySessions {
    sessions: DashMap<i64, NavigationState>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessions {
    fn load(&self, user_id: i64) -> NavigationState {
        self.sessions.get(&user_id).map(|s| s.value().clone()).unwrap_or_default()
    }

    fn store(&self, user_id: i64, state: NavigationState) {
        self.sessions.insert(user_id, state);
    }

    fn reset(&self, user_id: i64) {
        self.sessions.remove(&user_id);
    }
}

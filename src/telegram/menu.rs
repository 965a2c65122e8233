//! Menu rendering: pure projection of registry + navigation state
//!
//! Everything here is a pure function from (listing, role, path, pending
//! action) to a [`MenuDescriptor`]; no I/O. Listings arrive sorted from the
//! registry, so rendering the same unchanged folder twice produces an
//! identical descriptor, which also keeps Telegram from rejecting
//! "message is not modified" edits.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::config::validation::{MAX_CALLBACK_DATA_BYTES, MAX_LABEL_LENGTH};
use crate::registry::{FileKind, FolderListing, FolderPath};
use crate::session::PendingAction;
use crate::telegram::callback::{CallbackAction, ItemRef};

/// Capability tag resolved once per inbound action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// One button row: display label plus the action it triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub action: CallbackAction,
}

impl MenuItem {
    fn new(label: impl Into<String>, action: CallbackAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// An ordered menu: title text, one button per row, and the names behind
/// any indexed callback refs
///
/// `refs` must be stored in the pressing user's session when the menu is
/// shown; an indexed button press resolves against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDescriptor {
    pub title: String,
    pub items: Vec<MenuItem>,
    pub refs: Vec<String>,
}

impl MenuDescriptor {
    /// Projects the descriptor into a Telegram inline keyboard
    pub fn keyboard(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(
            self.items
                .iter()
                .map(|item| vec![InlineKeyboardButton::callback(item.label.clone(), item.action.encode())]),
        )
    }
}

/// Welcome menu sent on /start and after an interface sweep
pub fn main_menu() -> MenuDescriptor {
    MenuDescriptor {
        title: "📁 Welcome to the file shelf".to_string(),
        items: vec![
            MenuItem::new("📂 Browse Folders", CallbackAction::Browse),
            MenuItem::new("❌ Close", CallbackAction::Close),
            MenuItem::new("🧹 Clear Interface", CallbackAction::ClearInterface),
        ],
        refs: Vec::new(),
    }
}

/// Listing menu for one folder
///
/// Subfolders first, then files, both in the registry's lexicographic
/// order; role-conditional admin entry; Back and Clear always present.
pub fn folder_menu(listing: &FolderListing, role: Role, path: &FolderPath, pending: &PendingAction) -> MenuDescriptor {
    let mut items = Vec::with_capacity(listing.subfolders.len() + listing.files.len() + 3);
    let mut refs = Vec::new();

    for name in &listing.subfolders {
        items.push(MenuItem::new(
            format!("📁 {}", truncate_label(name)),
            named_action(name, &mut refs, CallbackAction::Open),
        ));
    }
    for file in &listing.files {
        items.push(MenuItem::new(
            format!("{} {}", kind_emoji(file.kind), truncate_label(&file.filename)),
            named_action(&file.filename, &mut refs, CallbackAction::Download),
        ));
    }
    if role.is_admin() {
        items.push(MenuItem::new("⚙️ Admin Panel", CallbackAction::AdminPanel));
    }
    items.push(MenuItem::new("🔙 Back", CallbackAction::Back));
    items.push(MenuItem::new("🧹 Clear Interface", CallbackAction::ClearInterface));

    let mut title = format!("📂 {}", path.display_name());
    match pending {
        PendingAction::AwaitingFolderName { .. } => title.push_str("\n✏️ Waiting for a folder name..."),
        PendingAction::AwaitingUpload { .. } => title.push_str("\n📤 Waiting for a file..."),
        PendingAction::None => {}
    }

    MenuDescriptor { title, items, refs }
}

/// Admin panel scoped to the current folder
pub fn admin_panel(path: &FolderPath) -> MenuDescriptor {
    MenuDescriptor {
        title: format!("⚙️ Admin Panel — {}", path.display_name()),
        items: vec![
            MenuItem::new("📁 Create Folder", CallbackAction::CreateFolder),
            MenuItem::new("📤 Upload File", CallbackAction::Upload),
            MenuItem::new("❌ Delete Folder", CallbackAction::DeleteFolderMenu),
            MenuItem::new("🗑️ Delete File", CallbackAction::DeleteFileMenu),
            MenuItem::new("🔙 Back", CallbackAction::Back),
            MenuItem::new("🧹 Clear Interface", CallbackAction::ClearInterface),
        ],
        refs: Vec::new(),
    }
}

/// Deletion target picker over the live subfolder list
///
/// Built from a fresh listing so the menu never offers a name that was
/// already gone when it was rendered.
pub fn delete_folder_menu(listing: &FolderListing) -> MenuDescriptor {
    let mut refs = Vec::new();
    let mut items: Vec<MenuItem> = listing
        .subfolders
        .iter()
        .map(|name| {
            MenuItem::new(
                truncate_label(name),
                named_action(name, &mut refs, CallbackAction::DeleteFolder),
            )
        })
        .collect();
    items.push(MenuItem::new("🔙 Back", CallbackAction::Back));
    items.push(MenuItem::new("🧹 Clear Interface", CallbackAction::ClearInterface));

    MenuDescriptor {
        title: "🗑️ Select a folder to delete:".to_string(),
        items,
        refs,
    }
}

/// Deletion target picker over the live file list
pub fn delete_file_menu(listing: &FolderListing) -> MenuDescriptor {
    let mut refs = Vec::new();
    let mut items: Vec<MenuItem> = listing
        .files
        .iter()
        .map(|file| {
            MenuItem::new(
                truncate_label(&file.filename),
                named_action(&file.filename, &mut refs, CallbackAction::DeleteFile),
            )
        })
        .collect();
    items.push(MenuItem::new("🔙 Back", CallbackAction::Back));
    items.push(MenuItem::new("🧹 Clear Interface", CallbackAction::ClearInterface));

    MenuDescriptor {
        title: "🗑️ Select a file to delete:".to_string(),
        items,
        refs,
    }
}

/// Builds a name-carrying action, inline when the encoded payload fits the
/// transport's callback-data budget, indexed through `refs` otherwise
fn named_action(name: &str, refs: &mut Vec<String>, make: fn(ItemRef) -> CallbackAction) -> CallbackAction {
    let inline = make(ItemRef::Name(name.to_string()));
    if inline.encode().len() <= MAX_CALLBACK_DATA_BYTES {
        inline
    } else {
        refs.push(name.to_string());
        make(ItemRef::Index(refs.len() - 1))
    }
}

fn kind_emoji(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Document => "📄",
        FileKind::Photo => "🖼",
        FileKind::Video => "🎬",
        FileKind::Audio => "🎵",
    }
}

/// Truncates a display label; the full name stays resolvable through the
/// callback data or the ref table
fn truncate_label(name: &str) -> String {
    if name.chars().count() <= MAX_LABEL_LENGTH {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(MAX_LABEL_LENGTH).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FileRef;
    use pretty_assertions::assert_eq;

    fn listing() -> FolderListing {
        FolderListing {
            subfolders: vec!["Crypto".to_string(), "Network".to_string()],
            files: vec![FileRef {
                filename: "intro.pdf".to_string(),
                file_id: "ABC123".to_string(),
                kind: FileKind::Document,
            }],
        }
    }

    fn long_listing() -> (String, FolderListing) {
        // Valid name at the 100-char bound; multibyte so bytes > chars
        let long = "д".repeat(100);
        let l = FolderListing {
            subfolders: vec![long.clone()],
            files: vec![FileRef {
                filename: long.clone(),
                file_id: "id".to_string(),
                kind: FileKind::Document,
            }],
        };
        (long, l)
    }

    #[test]
    fn rendering_is_deterministic() {
        let path = FolderPath::from_segments(["Lectures"]).unwrap();
        let a = folder_menu(&listing(), Role::User, &path, &PendingAction::None);
        let b = folder_menu(&listing(), Role::User, &path, &PendingAction::None);
        assert_eq!(a, b);
        assert_eq!(a.keyboard(), b.keyboard());
    }

    #[test]
    fn subfolders_precede_files_and_keep_sorted_order() {
        let path = FolderPath::root();
        let menu = folder_menu(&listing(), Role::User, &path, &PendingAction::None);
        let actions: Vec<_> = menu.items.iter().map(|i| i.action.clone()).collect();
        assert_eq!(
            &actions[..3],
            &[
                CallbackAction::Open(ItemRef::Name("Crypto".to_string())),
                CallbackAction::Open(ItemRef::Name("Network".to_string())),
                CallbackAction::Download(ItemRef::Name("intro.pdf".to_string())),
            ]
        );
        // Short names never go through the ref table
        assert!(menu.refs.is_empty());
    }

    #[test]
    fn admin_entry_is_role_conditional() {
        let path = FolderPath::root();
        let user_menu = folder_menu(&listing(), Role::User, &path, &PendingAction::None);
        let admin_menu = folder_menu(&listing(), Role::Admin, &path, &PendingAction::None);
        assert!(!user_menu.items.iter().any(|i| i.action == CallbackAction::AdminPanel));
        assert!(admin_menu.items.iter().any(|i| i.action == CallbackAction::AdminPanel));
    }

    #[test]
    fn back_and_clear_are_always_present() {
        let path = FolderPath::root();
        for menu in [
            folder_menu(&FolderListing::default(), Role::User, &path, &PendingAction::None),
            admin_panel(&path),
            delete_folder_menu(&FolderListing::default()),
            delete_file_menu(&FolderListing::default()),
        ] {
            assert!(menu.items.iter().any(|i| i.action == CallbackAction::Back));
            assert!(menu.items.iter().any(|i| i.action == CallbackAction::ClearInterface));
        }
    }

    #[test]
    fn callback_payloads_fit_the_transport_budget_for_any_valid_name() {
        let (_, l) = long_listing();
        for menu in [
            folder_menu(&l, Role::Admin, &FolderPath::root(), &PendingAction::None),
            delete_folder_menu(&l),
            delete_file_menu(&l),
        ] {
            for item in &menu.items {
                assert!(item.action.encode().len() <= MAX_CALLBACK_DATA_BYTES);
            }
        }
    }

    #[test]
    fn long_names_truncate_in_label_but_resolve_to_the_full_name() {
        let (long, l) = long_listing();
        let menu = folder_menu(&l, Role::User, &FolderPath::root(), &PendingAction::None);
        assert!(menu.items[0].label.chars().count() <= MAX_LABEL_LENGTH + 3);

        let CallbackAction::Open(item) = &menu.items[0].action else {
            panic!("expected an open action");
        };
        assert_eq!(item.resolve(&menu.refs).as_deref(), Some(long.as_str()));
        let CallbackAction::Download(item) = &menu.items[1].action else {
            panic!("expected a download action");
        };
        assert_eq!(item.resolve(&menu.refs).as_deref(), Some(long.as_str()));
    }

    #[test]
    fn pending_action_shows_in_title() {
        let path = FolderPath::root();
        let pending = PendingAction::AwaitingUpload {
            target: FolderPath::root(),
        };
        let menu = folder_menu(&FolderListing::default(), Role::Admin, &path, &pending);
        assert!(menu.title.contains("Waiting for a file"));
    }
}

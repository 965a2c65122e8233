//! Callback-data encoding for inline keyboard actions
//!
//! Encoded as `verb`, `verb:name` or `verb#index`, split once on the first
//! separator so an inline name may itself contain `:`. Telegram rejects
//! keyboards whose callback data exceeds 64 bytes, so names that do not fit
//! inline are replaced at render time by an index into a per-user table of
//! names captured with the menu; `#` never starts an inline argument.

/// Argument of a name-carrying action
///
/// Short names ride inline in the callback data. Names that would push the
/// payload over the transport budget are referenced by their position in
/// the ref table the menu layer emitted alongside the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Name(String),
    Index(usize),
}

impl ItemRef {
    /// Resolves to the full name; indexed refs go through the table
    /// captured at render time and fail on a stale or foreign keyboard
    pub fn resolve(&self, refs: &[String]) -> Option<String> {
        match self {
            ItemRef::Name(name) => Some(name.clone()),
            ItemRef::Index(i) => refs.get(*i).cloned(),
        }
    }

    fn encode(&self, verb: &str) -> String {
        match self {
            ItemRef::Name(name) => format!("{}:{}", verb, name),
            ItemRef::Index(i) => format!("{}#{}", verb, i),
        }
    }
}

/// One actionable button, as carried in callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Jump to the root folder listing
    Browse,
    /// Descend into a direct subfolder of the current folder
    Open(ItemRef),
    /// Go up one level
    Back,
    /// Send the named file from the current folder
    Download(ItemRef),
    /// Show the admin panel for the current folder
    AdminPanel,
    /// Arm the create-folder flow for the current folder
    CreateFolder,
    /// Arm the upload flow for the current folder
    Upload,
    /// Show the live subfolder list to pick a deletion target
    DeleteFolderMenu,
    /// Delete the named subfolder (cascading)
    DeleteFolder(ItemRef),
    /// Show the live file list to pick a deletion target
    DeleteFileMenu,
    /// Delete the named file
    DeleteFile(ItemRef),
    /// Best-effort sweep of recent bot messages, then a fresh main menu
    ClearInterface,
    /// Delete the menu message itself
    Close,
}

impl CallbackAction {
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::Browse => "browse".to_string(),
            CallbackAction::Open(item) => item.encode("open"),
            CallbackAction::Back => "back".to_string(),
            CallbackAction::Download(item) => item.encode("dl"),
            CallbackAction::AdminPanel => "admin".to_string(),
            CallbackAction::CreateFolder => "mkdir".to_string(),
            CallbackAction::Upload => "upload".to_string(),
            CallbackAction::DeleteFolderMenu => "rmdir_menu".to_string(),
            CallbackAction::DeleteFolder(item) => item.encode("rmdir"),
            CallbackAction::DeleteFileMenu => "rmfile_menu".to_string(),
            CallbackAction::DeleteFile(item) => item.encode("rmfile"),
            CallbackAction::ClearInterface => "clear".to_string(),
            CallbackAction::Close => "close".to_string(),
        }
    }

    /// Parses callback data; `None` for anything this bot never emitted
    pub fn parse(data: &str) -> Option<Self> {
        if let Some((verb, name)) = data.split_once(':') {
            return Self::with_item(verb, ItemRef::Name(name.to_string()));
        }
        if let Some((verb, index)) = data.split_once('#') {
            return Self::with_item(verb, ItemRef::Index(index.parse().ok()?));
        }

        match data {
            "browse" => Some(CallbackAction::Browse),
            "back" => Some(CallbackAction::Back),
            "admin" => Some(CallbackAction::AdminPanel),
            "mkdir" => Some(CallbackAction::CreateFolder),
            "upload" => Some(CallbackAction::Upload),
            "rmdir_menu" => Some(CallbackAction::DeleteFolderMenu),
            "rmfile_menu" => Some(CallbackAction::DeleteFileMenu),
            "clear" => Some(CallbackAction::ClearInterface),
            "close" => Some(CallbackAction::Close),
            _ => None,
        }
    }

    fn with_item(verb: &str, item: ItemRef) -> Option<Self> {
        match verb {
            "open" => Some(CallbackAction::Open(item)),
            "dl" => Some(CallbackAction::Download(item)),
            "rmdir" => Some(CallbackAction::DeleteFolder(item)),
            "rmfile" => Some(CallbackAction::DeleteFile(item)),
            _ => None,
        }
    }
}

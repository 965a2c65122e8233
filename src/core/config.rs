use once_cell::sync::Lazy;
use std::env;

/// Configuration constants for the bot

/// Username of the single administrator (without the leading @).
/// Read once at startup from the ADMIN_USERNAME environment variable.
/// The bot refuses to start without it: every write operation is gated
/// on this identity.
pub static ADMIN_USERNAME: Lazy<Option<String>> = Lazy::new(|| {
    env::var("ADMIN_USERNAME")
        .ok()
        .map(|u| u.trim_start_matches('@').to_string())
        .filter(|u| !u.is_empty())
});

/// Path to the SQLite database holding the folder registry.
/// Read from DATABASE_PATH, defaults to "teleshelf.sqlite" in the
/// working directory.
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "teleshelf.sqlite".to_string()));

/// Path to the log file, read from LOG_FILE_PATH.
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "teleshelf.log".to_string()));

/// Validation bounds shared by the registry and the menus
pub mod validation {
    /// Maximum length of a folder name or filename, in characters
    pub const MAX_NAME_LENGTH: usize = 100;

    /// Maximum length of a button label before display truncation.
    /// Truncation never touches the identifier carried in callback data.
    pub const MAX_LABEL_LENGTH: usize = 40;

    /// Telegram caps callback data at 64 bytes per button. Actions whose
    /// inline encoding would exceed this carry an index into the
    /// render-time ref table instead of the name itself.
    pub const MAX_CALLBACK_DATA_BYTES: usize = 64;
}

/// Network configuration
pub mod network {
    use std::time::Duration;

    /// Request timeout for Telegram API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Interface cleanup configuration
pub mod cleanup {
    /// How many recent messages the "Clear Interface" button sweeps.
    /// Best-effort: ids that no longer exist are skipped silently.
    pub const SWEEP_MESSAGE_COUNT: i32 = 10;
}

/// Database configuration
pub mod db {
    use std::time::Duration;

    /// Maximum number of pooled SQLite connections
    pub const POOL_MAX_SIZE: u32 = 10;

    /// SQLite busy timeout applied to every pooled connection
    pub fn busy_timeout() -> Duration {
        Duration::from_secs(30)
    }
}

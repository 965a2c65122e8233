//! Telegram transport layer: bot setup, menus, callback routing, handlers

pub mod bot;
pub mod callback;
pub mod handlers;
pub mod menu;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use callback::{CallbackAction, ItemRef};
pub use handlers::{schema, HandlerDeps};
pub use menu::Role;

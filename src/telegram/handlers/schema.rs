//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::callbacks::handle_callback;
use super::commands::handle_command;
use super::messages::{handle_media_message, handle_text_message};
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Returns a handler tree usable with teloxide's Dispatcher; the same
/// schema serves production and integration tests. Order matters:
/// commands before plain text, media before text, callbacks last.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_media = deps.clone();
    let deps_text = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                    let deps = deps_commands.clone();
                    async move {
                        handle_command(bot, msg, cmd, deps).await?;
                        Ok(())
                    }
                }),
        )
        .branch(
            Update::filter_message()
                .filter(|msg: Message| {
                    msg.document().is_some() || msg.photo().is_some() || msg.video().is_some() || msg.audio().is_some()
                })
                .endpoint(move |bot: Bot, msg: Message| {
                    let deps = deps_media.clone();
                    async move {
                        handle_media_message(bot, msg, deps).await?;
                        Ok(())
                    }
                }),
        )
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.text().map(|t| !t.starts_with('/')).unwrap_or(false))
                .endpoint(move |bot: Bot, msg: Message| {
                    let deps = deps_text.clone();
                    async move {
                        handle_text_message(bot, msg, deps).await?;
                        Ok(())
                    }
                }),
        )
        .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
            let deps = deps_callback.clone();
            async move {
                handle_callback(bot, q, deps).await?;
                Ok(())
            }
        }))
}

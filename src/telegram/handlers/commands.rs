//! /start and /stats command handlers

use teloxide::prelude::*;

use super::types::{resolve_role, HandlerDeps};
use crate::telegram::bot::Command;
use crate::telegram::handlers::user_notice;
use crate::telegram::menu;

/// Dispatches a parsed bot command
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, deps: HandlerDeps) -> ResponseResult<()> {
    match cmd {
        Command::Start => handle_start(bot, msg, deps).await,
        Command::Stats => handle_stats(bot, msg, deps).await,
    }
}

/// /start: session back to the root, fresh main menu
async fn handle_start(bot: Bot, msg: Message, deps: HandlerDeps) -> ResponseResult<()> {
    if let Some(user) = msg.from.as_ref() {
        let user_id = i64::try_from(user.id.0).unwrap_or(0);
        deps.sessions.reset(user_id);
        log::info!("Session reset for user {}", user_id);
    }

    let menu = menu::main_menu();
    bot.send_message(msg.chat.id, menu.title.clone())
        .reply_markup(menu.keyboard())
        .await?;
    Ok(())
}

/// /stats: aggregate folder/file counts, admin only
async fn handle_stats(bot: Bot, msg: Message, deps: HandlerDeps) -> ResponseResult<()> {
    let role = resolve_role(msg.from.as_ref().and_then(|u| u.username.as_deref()));
    if !role.is_admin() {
        bot.send_message(msg.chat.id, "⛔ Admin only.").await?;
        return Ok(());
    }

    match deps.registry.stats() {
        Ok(stats) => {
            bot.send_message(
                msg.chat.id,
                format!("📊 Folders: {}\n📄 Files: {}", stats.folders, stats.files),
            )
            .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, user_notice(&e)).await?;
        }
    }
    Ok(())
}

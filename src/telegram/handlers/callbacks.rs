//! Inline keyboard callback dispatch
//!
//! One inbound button press is resolved against the user's navigation
//! state, dispatched to the registry, and the result is projected back into
//! a menu edit. Registry errors become short notices here; nothing below
//! this boundary is allowed to kill the session.

use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, MessageId};

use super::types::{resolve_role, HandlerDeps};
use crate::core::config;
use crate::registry::{FileKind, FileRef};
use crate::session::NavigationState;
use crate::telegram::callback::CallbackAction;
use crate::telegram::handlers::user_notice;
use crate::telegram::menu::{self, MenuDescriptor, Role};

/// Handles a callback query from any inline keyboard this bot produced
pub async fn handle_callback(bot: Bot, q: CallbackQuery, deps: HandlerDeps) -> ResponseResult<()> {
    let Some(data) = q.data.as_deref() else {
        answer(&bot, &q).await;
        return Ok(());
    };
    let Some(action) = CallbackAction::parse(data) else {
        log::warn!("Unrecognized callback data: {}", data);
        answer(&bot, &q).await;
        return Ok(());
    };

    let (chat_id, message_id) = match q.message.as_ref() {
        Some(m) => (m.chat().id, m.id()),
        None => {
            answer(&bot, &q).await;
            return Ok(());
        }
    };

    let user_id = i64::try_from(q.from.id.0).unwrap_or(0);
    let role = resolve_role(q.from.username.as_deref());
    let mut state = deps.sessions.load(user_id);

    match action {
        CallbackAction::Close => {
            // Already-deleted messages are fine
            let _ = bot.delete_message(chat_id, message_id).await;
            answer(&bot, &q).await;
        }

        CallbackAction::ClearInterface => {
            answer(&bot, &q).await;
            sweep_recent_messages(&bot, chat_id, message_id).await;
            let menu = menu::main_menu();
            bot.send_message(chat_id, "🧹 Interface cleared.")
                .reply_markup(menu.keyboard())
                .await?;
        }

        CallbackAction::Browse => {
            state.reset();
            show_folder(&bot, &q, chat_id, message_id, &deps, &mut state, role).await;
            deps.sessions.store(user_id, state);
        }

        CallbackAction::Open(item) => {
            let Some(name) = item.resolve(&state.menu_refs) else {
                alert(&bot, &q, "❌ Folder not found").await;
                return Ok(());
            };
            match state.open_folder(&deps.registry, &name) {
                Ok(()) => {
                    show_folder(&bot, &q, chat_id, message_id, &deps, &mut state, role).await;
                    deps.sessions.store(user_id, state);
                }
                Err(e) => alert(&bot, &q, &user_notice(&e)).await,
            }
        }

        CallbackAction::Back => {
            state.go_back();
            // The folder we backed into may have been deleted meanwhile;
            // fall back to the root rather than stranding the cursor.
            if deps.registry.list_children(&state.current).is_err() {
                state.reset();
            }
            show_folder(&bot, &q, chat_id, message_id, &deps, &mut state, role).await;
            deps.sessions.store(user_id, state);
        }

        CallbackAction::Download(item) => {
            let Some(name) = item.resolve(&state.menu_refs) else {
                alert(&bot, &q, "❌ File not found").await;
                return Ok(());
            };
            match deps.registry.resolve_file(&state.current, &name) {
                Ok(file) => {
                    if let Err(e) = send_file(&bot, chat_id, &file).await {
                        log::error!("Failed to send '{}' ({}): {}", file.filename, file.file_id, e);
                        alert(&bot, &q, "❌ Could not send the file").await;
                    } else {
                        answer(&bot, &q).await;
                    }
                }
                Err(e) => alert(&bot, &q, &user_notice(&e)).await,
            }
        }

        CallbackAction::AdminPanel => {
            if require_admin(&bot, &q, role).await {
                answer(&bot, &q).await;
                show_menu(&bot, chat_id, message_id, &menu::admin_panel(&state.current)).await;
            }
        }

        CallbackAction::CreateFolder => {
            if require_admin(&bot, &q, role).await {
                state.begin_create_folder();
                deps.sessions.store(user_id, state);
                answer(&bot, &q).await;
                edit_text(&bot, chat_id, message_id, "✏️ Send the name for the new folder:").await;
            }
        }

        CallbackAction::Upload => {
            if require_admin(&bot, &q, role).await {
                state.begin_upload();
                deps.sessions.store(user_id, state);
                answer(&bot, &q).await;
                edit_text(&bot, chat_id, message_id, "📤 Now send the file to upload into this folder.").await;
            }
        }

        CallbackAction::DeleteFolderMenu => {
            if require_admin(&bot, &q, role).await {
                match deps.registry.list_children(&state.current) {
                    Ok(listing) => {
                        answer(&bot, &q).await;
                        let menu = menu::delete_folder_menu(&listing);
                        state.menu_refs = menu.refs.clone();
                        deps.sessions.store(user_id, state);
                        if listing.subfolders.is_empty() {
                            show_titled(&bot, chat_id, message_id, "⚠️ No subfolders to delete.", &menu).await;
                        } else {
                            show_menu(&bot, chat_id, message_id, &menu).await;
                        }
                    }
                    Err(e) => alert(&bot, &q, &user_notice(&e)).await,
                }
            }
        }

        CallbackAction::DeleteFolder(item) => {
            if require_admin(&bot, &q, role).await {
                let Some(name) = item.resolve(&state.menu_refs) else {
                    alert(&bot, &q, "❌ Folder not found").await;
                    return Ok(());
                };
                match deps.registry.delete_folder(&state.current, &name) {
                    Ok(()) => {
                        answer(&bot, &q).await;
                        let panel = menu::admin_panel(&state.current);
                        show_titled(
                            &bot,
                            chat_id,
                            message_id,
                            &format!("✅ Folder '{}' deleted.", name),
                            &panel,
                        )
                        .await;
                    }
                    Err(e) => alert(&bot, &q, &user_notice(&e)).await,
                }
            }
        }

        CallbackAction::DeleteFileMenu => {
            if require_admin(&bot, &q, role).await {
                match deps.registry.list_children(&state.current) {
                    Ok(listing) => {
                        answer(&bot, &q).await;
                        let menu = menu::delete_file_menu(&listing);
                        state.menu_refs = menu.refs.clone();
                        deps.sessions.store(user_id, state);
                        if listing.files.is_empty() {
                            show_titled(&bot, chat_id, message_id, "⚠️ No files to delete.", &menu).await;
                        } else {
                            show_menu(&bot, chat_id, message_id, &menu).await;
                        }
                    }
                    Err(e) => alert(&bot, &q, &user_notice(&e)).await,
                }
            }
        }

        CallbackAction::DeleteFile(item) => {
            if require_admin(&bot, &q, role).await {
                let Some(name) = item.resolve(&state.menu_refs) else {
                    alert(&bot, &q, "❌ File not found").await;
                    return Ok(());
                };
                match deps.registry.delete_file(&state.current, &name) {
                    Ok(()) => {
                        answer(&bot, &q).await;
                        let panel = menu::admin_panel(&state.current);
                        show_titled(&bot, chat_id, message_id, &format!("✅ File '{}' deleted.", name), &panel)
                            .await;
                    }
                    Err(e) => alert(&bot, &q, &user_notice(&e)).await,
                }
            }
        }
    }

    Ok(())
}

/// Renders the user's current folder and captures the menu's ref table
/// into the session state, so indexed button presses resolve later
async fn show_folder(
    bot: &Bot,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    deps: &HandlerDeps,
    state: &mut NavigationState,
    role: Role,
) {
    match deps.registry.list_children(&state.current) {
        Ok(listing) => {
            answer(bot, q).await;
            let menu = menu::folder_menu(&listing, role, &state.current, &state.pending);
            state.menu_refs = menu.refs.clone();
            show_menu(bot, chat_id, message_id, &menu).await;
        }
        Err(e) => alert(bot, q, &user_notice(&e)).await,
    }
}

/// Admin gate for callback actions; alerts and returns false for everyone else
async fn require_admin(bot: &Bot, q: &CallbackQuery, role: Role) -> bool {
    if role.is_admin() {
        true
    } else {
        alert(bot, q, "⛔ Not authorized.").await;
        false
    }
}

/// Sends a stored file back through the transport, picking the send method
/// from the stored kind
async fn send_file(bot: &Bot, chat_id: ChatId, file: &FileRef) -> ResponseResult<()> {
    let input = InputFile::file_id(FileId(file.file_id.clone()));
    let caption = format!("📄 {}", file.filename);
    match file.kind {
        FileKind::Document => {
            bot.send_document(chat_id, input).caption(caption).await?;
        }
        FileKind::Photo => {
            bot.send_photo(chat_id, input).caption(caption).await?;
        }
        FileKind::Video => {
            bot.send_video(chat_id, input).caption(caption).await?;
        }
        FileKind::Audio => {
            bot.send_audio(chat_id, input).caption(caption).await?;
        }
    }
    Ok(())
}

/// Best-effort deletion of recent bot messages, newest first.
/// Transport-side cleanup heuristic: ids that don't exist are skipped.
async fn sweep_recent_messages(bot: &Bot, chat_id: ChatId, newest: MessageId) {
    for offset in 0..config::cleanup::SWEEP_MESSAGE_COUNT {
        let _ = bot.delete_message(chat_id, MessageId(newest.0 - offset)).await;
    }
}

async fn show_menu(bot: &Bot, chat_id: ChatId, message_id: MessageId, menu: &MenuDescriptor) {
    show_titled(bot, chat_id, message_id, &menu.title, menu).await;
}

/// Edits the menu message with a custom title over the menu's keyboard.
/// "Message is not modified" and similar edit failures are non-fatal.
async fn show_titled(bot: &Bot, chat_id: ChatId, message_id: MessageId, title: &str, menu: &MenuDescriptor) {
    if let Err(e) = bot
        .edit_message_text(chat_id, message_id, title)
        .reply_markup(menu.keyboard())
        .await
    {
        log::warn!("Failed to edit menu message {}: {}", message_id.0, e);
    }
}

async fn edit_text(bot: &Bot, chat_id: ChatId, message_id: MessageId, text: &str) {
    if let Err(e) = bot.edit_message_text(chat_id, message_id, text).await {
        log::warn!("Failed to edit message {}: {}", message_id.0, e);
    }
}

async fn answer(bot: &Bot, q: &CallbackQuery) {
    let _ = bot.answer_callback_query(q.id.clone()).await;
}

async fn alert(bot: &Bot, q: &CallbackQuery, text: &str) {
    let _ = bot.answer_callback_query(q.id.clone()).text(text).show_alert(true).await;
}

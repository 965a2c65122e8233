//! Pending-action inputs: folder names (text) and uploads (media)
//!
//! A pending action is consumed by the next *matching* input only: a text
//! message while an upload is pending leaves the flag armed, and vice
//! versa. Once consumed, the flag clears whether the registry call
//! succeeds or not; the admin re-initiates on failure.

use teloxide::prelude::*;

use super::types::{resolve_role, HandlerDeps};
use crate::registry::FileKind;
use crate::session::PendingAction;
use crate::telegram::handlers::user_notice;

/// Handles a plain text message: the folder name for an armed create flow
pub async fn handle_text_message(bot: Bot, msg: Message, deps: HandlerDeps) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    if !resolve_role(user.username.as_deref()).is_admin() {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    let user_id = i64::try_from(user.id.0).unwrap_or(0);
    let mut state = deps.sessions.load(user_id);

    let target = match state.take_pending() {
        PendingAction::AwaitingFolderName { target } => target,
        other => {
            // Not the input this flag is waiting for; leave it armed
            state.pending = other;
            deps.sessions.store(user_id, state);
            return Ok(());
        }
    };
    deps.sessions.store(user_id, state);

    let name = text.trim();

    match deps.registry.create_folder(&target, name) {
        Ok(_) => {
            bot.send_message(msg.chat.id, format!("✅ Folder '{}' created.", name)).await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, user_notice(&e)).await?;
        }
    }
    Ok(())
}

/// Handles a media message: files the upload into the armed target folder,
/// or into the admin's current folder if no upload is pending
pub async fn handle_media_message(bot: Bot, msg: Message, deps: HandlerDeps) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    if !resolve_role(user.username.as_deref()).is_admin() {
        bot.send_message(msg.chat.id, "⛔ Not authorized to upload files.").await?;
        return Ok(());
    }

    let user_id = i64::try_from(user.id.0).unwrap_or(0);
    let mut state = deps.sessions.load(user_id);

    let target = match state.take_pending() {
        PendingAction::AwaitingUpload { target } => target,
        other => {
            state.pending = other;
            state.current.clone()
        }
    };
    deps.sessions.store(user_id, state);

    let Some((file_id, suggested_name, kind)) = extract_media(&msg) else {
        return Ok(());
    };

    match deps
        .registry
        .add_file(&target, suggested_name.as_deref().unwrap_or(""), &file_id, kind)
    {
        Ok(stored_name) => {
            bot.send_message(msg.chat.id, format!("✅ File '{}' uploaded.", stored_name))
                .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, user_notice(&e)).await?;
        }
    }
    Ok(())
}

/// Pulls (file_id, suggested filename, kind) out of a media message.
/// Photos carry no filename on the wire; the registry generates one.
fn extract_media(msg: &Message) -> Option<(String, Option<String>, FileKind)> {
    if let Some(doc) = msg.document() {
        return Some((doc.file.id.0.clone(), doc.file_name.clone(), FileKind::Document));
    }
    if let Some(photos) = msg.photo() {
        let largest = photos.iter().max_by_key(|p| p.width * p.height)?;
        return Some((largest.file.id.0.clone(), None, FileKind::Photo));
    }
    if let Some(video) = msg.video() {
        return Some((video.file.id.0.clone(), video.file_name.clone(), FileKind::Video));
    }
    if let Some(audio) = msg.audio() {
        return Some((audio.file.id.0.clone(), audio.file_name.clone(), FileKind::Audio));
    }
    None
}

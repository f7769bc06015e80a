use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode, User};
use teloxide::utils::html;
use tracing::{error, info, warn};

use super::{messages, HandlerResult, RegistrationDialogue, RegistrationState};
use crate::error::Error;
use crate::model::PlayerStats;
use crate::service::{CardService, Registration};

fn telegram_id(user: &User) -> i64 {
    user.id.0 as i64
}

async fn reply(bot: &Bot, msg: &Message, text: &str) -> HandlerResult {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Render the card for `stats` and send it as a photo, or the render
/// failure message when the card cannot be built.
async fn send_card(
    bot: &Bot,
    msg: &Message,
    service: &CardService,
    stats: &PlayerStats,
    caption: String,
) -> HandlerResult {
    match service.card(stats).await {
        Ok(png) => send_photo(bot, msg, png, caption).await,
        Err(e) => {
            error!(player = %stats.name, error = %e, "failed to render player card");
            reply(bot, msg, messages::CARD_FAILED).await
        }
    }
}

async fn send_photo(bot: &Bot, msg: &Message, png: Vec<u8>, caption: String) -> HandlerResult {
    bot.send_photo(msg.chat.id, InputFile::memory(png).file_name("card.png"))
        .caption(caption)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

pub(super) async fn start(bot: Bot, msg: Message) -> HandlerResult {
    reply(&bot, &msg, messages::WELCOME).await
}

pub(super) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    reply(&bot, &msg, messages::HELP).await
}

pub(super) async fn start_registration(
    bot: Bot,
    msg: Message,
    dialogue: RegistrationDialogue,
) -> HandlerResult {
    dialogue.update(RegistrationState::AwaitingNickname).await?;
    reply(&bot, &msg, messages::REGISTRATION_PROMPT).await
}

pub(super) async fn register_outside_private(bot: Bot, msg: Message) -> HandlerResult {
    reply(&bot, &msg, messages::REGISTER_IN_PRIVATE).await
}

/// Text received while a registration is pending. Only a nickname that
/// resolves to a player ends the dialogue.
pub(super) async fn receive_nickname(
    bot: Bot,
    msg: Message,
    dialogue: RegistrationDialogue,
    service: Arc<CardService>,
) -> HandlerResult {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let Some(nickname) = msg.text().and_then(|t| t.split_whitespace().next()) else {
        return reply(&bot, &msg, messages::REGISTRATION_PROMPT).await;
    };

    match service.register(telegram_id(user), nickname).await {
        Ok(Registration::Registered(stats)) => {
            info!(user_id = telegram_id(user), nickname, "user registered");
            dialogue.exit().await?;
            send_card(&bot, &msg, &service, &stats, messages::REGISTRATION_OK.to_string()).await
        }
        Ok(Registration::NotFound) => reply(&bot, &msg, messages::NICKNAME_NOT_FOUND).await,
        Ok(Registration::StorageFailed(_)) => reply(&bot, &msg, messages::REGISTRATION_FAILED).await,
        Err(e) => {
            warn!(nickname, error = %e, "stats site unavailable during registration");
            reply(&bot, &msg, messages::SITE_UNAVAILABLE).await
        }
    }
}

/// `/stat [nickname]`: card for the given nickname, or for the caller's
/// registered one.
pub(super) async fn stat(
    bot: Bot,
    msg: Message,
    argument: String,
    service: Arc<CardService>,
) -> HandlerResult {
    let nickname = match msg.from.as_ref() {
        Some(user) => service.resolve_nickname(telegram_id(user), &argument).await,
        None => argument.split_whitespace().next().map(str::to_string),
    };
    let Some(nickname) = nickname else {
        return reply(&bot, &msg, messages::NOT_REGISTERED).await;
    };

    match service.player_card(&nickname).await {
        Ok(Some((_, png))) => {
            let caption = format!(
                "{} <b>{}</b>",
                messages::STAT_CAPTION,
                html::escape(&nickname)
            );
            send_photo(&bot, &msg, png, caption).await
        }
        Ok(None) => reply(&bot, &msg, messages::NICKNAME_NOT_FOUND).await,
        Err(Error::Fetch(e)) => {
            warn!(nickname = %nickname, error = %e, "stats site unavailable");
            reply(&bot, &msg, messages::SITE_UNAVAILABLE).await
        }
        Err(e) => {
            error!(nickname = %nickname, error = %e, "failed to build player card");
            reply(&bot, &msg, messages::CARD_FAILED).await
        }
    }
}

//! Telegram front end: command parsing, the registration dialogue and
//! update dispatching.

mod handlers;
pub mod messages;

use std::sync::Arc;

use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::service::CardService;

pub(crate) type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub(crate) type HandlerResult = Result<(), HandlerError>;
pub(crate) type RegistrationDialogue = Dialogue<RegistrationState, InMemStorage<RegistrationState>>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды бота:")]
pub enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "список команд")]
    Help,
    #[command(description = "привязать никнейм Faceit (в личных сообщениях)")]
    Register,
    #[command(description = "карточка игрока: /stat [никнейм]")]
    Stat(String),
}

/// Per-chat registration flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RegistrationState {
    #[default]
    Idle,
    /// `/register` was sent; the next plain text message is the nickname.
    AwaitingNickname,
}

/// Build the update handler tree.
pub fn schema() -> UpdateHandler<HandlerError> {
    use dptree::case;

    let commands = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(handlers::start))
        .branch(case![Command::Help].endpoint(handlers::help))
        .branch(
            case![Command::Register]
                .filter(|msg: Message| msg.chat.is_private())
                .endpoint(handlers::start_registration),
        )
        .branch(case![Command::Register].endpoint(handlers::register_outside_private))
        .branch(case![Command::Stat(argument)].endpoint(handlers::stat));

    let registration = case![RegistrationState::AwaitingNickname]
        .filter(|msg: Message| msg.chat.is_private() && is_plain_text(&msg))
        .endpoint(handlers::receive_nickname);

    Update::filter_message()
        .enter_dialogue::<Message, InMemStorage<RegistrationState>, RegistrationState>()
        .branch(commands)
        .branch(registration)
}

fn is_plain_text(msg: &Message) -> bool {
    msg.text().is_some_and(|text| !text.starts_with('/'))
}

/// Publish the command list and process updates until Ctrl-C.
///
/// A failing handler is logged and does not stop the dispatcher.
pub async fn run(bot: Bot, service: CardService) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "failed to publish bot commands");
    }

    info!("bot started");
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![
            InMemStorage::<RegistrationState>::new(),
            Arc::new(service)
        ])
        .default_handler(|update| async move {
            debug!(update_id = ?update.id, "unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "an error occurred while handling an update",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    info!("bot stopped");
}

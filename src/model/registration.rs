use chrono::NaiveDateTime;
use serde::Serialize;

/// A Telegram user linked to a faceit nickname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRegistration {
    pub telegram_id: i64,
    pub faceit_nickname: String,
    pub registered_at: NaiveDateTime,
}

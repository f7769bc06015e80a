//! Canned replies, formatted as Telegram HTML. Users never see raw error text.

pub const WELCOME: &str = "👋 <b>Привет!</b> Я показываю статистику игроков Faceit в CS2.\n\n\
    Отправь /stat <code>никнейм</code>, чтобы получить карточку игрока, \
    или /register, чтобы привязать свой Faceit аккаунт.\n\n\
    Все команды: /help";

pub const HELP: &str = "<b>Команды бота</b>\n\n\
    /stat <code>никнейм</code> — карточка игрока по никнейму Faceit\n\
    /stat — твоя карточка (после регистрации)\n\
    /register — привязать никнейм Faceit (только в личных сообщениях)\n\
    /help — эта справка";

pub const REGISTRATION_PROMPT: &str = "✏️ Отправь свой никнейм на <b>Faceit</b>.";

pub const REGISTRATION_OK: &str = "✅ Регистрация прошла успешно!";

pub const REGISTRATION_FAILED: &str = "⚠️ Не удалось сохранить регистрацию. Попробуй позже.";

pub const REGISTER_IN_PRIVATE: &str = "🔒 Регистрация доступна только в личных сообщениях с ботом.";

pub const NICKNAME_NOT_FOUND: &str = "❌ Игрок с таким никнеймом не найден. Проверь никнейм и попробуй ещё раз.";

pub const NOT_REGISTERED: &str = "ℹ️ Ты ещё не зарегистрирован. Используй /register \
    или укажи никнейм: /stat <code>никнейм</code>";

pub const SITE_UNAVAILABLE: &str = "⚠️ Сайт со статистикой сейчас недоступен. Попробуй позже.";

pub const CARD_FAILED: &str = "⚠️ Не удалось построить карточку игрока. Попробуй позже.";

/// Caption prefix of a `/stat` card; followed by the bold nickname.
pub const STAT_CAPTION: &str = "📊 Статистика игрока";

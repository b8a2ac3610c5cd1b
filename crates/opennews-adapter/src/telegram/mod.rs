/*
[INPUT]:  Telegram Bot API configuration
[OUTPUT]: Outbound notifications and command updates
[POS]:    Notification layer - module wiring
[UPDATE]: When adding bot methods
*/

pub mod client;

pub use client::{
    Chat, DEFAULT_TELEGRAM_API_BASE, IncomingMessage, MAX_MESSAGE_CHARS, TelegramClient, Update,
    truncate_message,
};

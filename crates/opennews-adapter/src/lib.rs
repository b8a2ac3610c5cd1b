/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public OpenNews adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod telegram;
pub mod tools;
pub mod types;
pub mod ws;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    DEFAULT_API_BASE_URL,
    OpenNewsClient,
    OpenNewsError,
    Result,
};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    DEFAULT_WSS_URL,
    NewsFeed,
    NewsFeedSocket,
    collect_latest,
};

// Re-export commonly used types from telegram
pub use telegram::{
    TelegramClient,
    Update,
};

// Re-export the tool surface entry points
pub use tools::{
    ToolContext,
    ToolResponse,
};

/*
[INPUT]:  Typed/bounded parameters from the host runtime
[OUTPUT]: JSON-serializable tool envelopes
[POS]:    Tool layer - module wiring
[UPDATE]: When adding tools
*/

pub mod context;
pub mod discovery;
pub mod knowledge;
pub mod news;
pub mod notify;
pub mod realtime;
pub mod response;

pub use context::{DEFAULT_MAX_ROWS, ToolContext};
pub use discovery::{get_news_sources, list_news_types};
pub use knowledge::{knowledge_guide, read_knowledge};
pub use news::{
    get_high_score_news, get_latest_news, get_news_by_engine, get_news_by_signal,
    get_news_by_source, search_news, search_news_advanced, search_news_by_coin,
};
pub use notify::send_telegram_notification;
pub use realtime::subscribe_latest_news;
pub use response::{ToolResponse, json_safe_bytes, json_safe_datetime, json_safe_decimal};

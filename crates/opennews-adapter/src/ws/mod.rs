/*
[INPUT]:  WebSocket configuration and subscription filters
[OUTPUT]: Real-time news messages
[POS]:    WebSocket layer - session transport and bounded collection
[UPDATE]: When changing connection or collection logic
*/

pub mod client;
pub mod collector;

pub use client::{DEFAULT_WSS_URL, NewsFeed, NewsFeedSocket};
pub use collector::{clamp_max_items, clamp_wait_seconds, collect_latest};

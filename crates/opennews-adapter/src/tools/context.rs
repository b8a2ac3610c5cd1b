/*
[INPUT]:  Configured clients and safety bounds
[OUTPUT]: Shared state available to every tool call
[POS]:    Tool layer - per-process tool context
[UPDATE]: When tools need new shared resources
*/

use std::path::PathBuf;

use crate::http::OpenNewsClient;
use crate::telegram::TelegramClient;

/// Default cap on rows any single tool call may request
pub const DEFAULT_MAX_ROWS: u32 = 100;

/// Shared state for the tool surface.
///
/// The WebSocket endpoint and token are kept as raw values rather than a
/// live socket: each realtime tool call opens its own ephemeral session and
/// never shares a connection with the monitor.
#[derive(Debug)]
pub struct ToolContext {
    pub api: OpenNewsClient,
    pub telegram: Option<TelegramClient>,
    pub wss_url: String,
    pub token: String,
    pub max_rows: u32,
    pub knowledge_dir: PathBuf,
}

impl ToolContext {
    /// Clamp a user-supplied limit to `[1, max_rows]`
    pub fn clamp_limit(&self, limit: u32) -> u32 {
        limit.clamp(1, self.max_rows)
    }
}

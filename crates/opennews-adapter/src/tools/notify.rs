/*
[INPUT]:  Message text from the host runtime
[OUTPUT]: Delivery envelope for the configured chat
[POS]:    Tool layer - outbound notification tool
[UPDATE]: When notification parameters change
*/

use serde_json::json;

use crate::tools::{ToolContext, ToolResponse};

/// Send a message to the configured Telegram chat
pub async fn send_telegram_notification(ctx: &ToolContext, message: &str) -> ToolResponse {
    let Some(telegram) = &ctx.telegram else {
        return ToolResponse::fail(
            "Telegram is not configured; set a bot token and chat id first",
        );
    };

    match telegram.send_message(None, message).await {
        Ok(()) => ToolResponse::ok(json!({"sent": true})),
        Err(err) => ToolResponse::fail(err),
    }
}

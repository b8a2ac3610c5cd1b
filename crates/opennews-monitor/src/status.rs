/*
[INPUT]:  Connection state transitions from the monitor loop
[OUTPUT]: Status snapshots readable by the command listener
[POS]:    State layer - single-writer/multi-reader status channel
[UPDATE]: When status fields change
*/

use tokio::sync::watch;

/// Snapshot of the monitor's connection state.
///
/// Written only by the monitor loop and published over a watch channel, so
/// readers always see the latest complete snapshot. Process lifetime only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorStatus {
    pub connected: bool,
    pub last_error: Option<String>,
}

impl MonitorStatus {
    pub fn connected() -> Self {
        Self {
            connected: true,
            last_error: None,
        }
    }

    pub fn disconnected(error: impl Into<String>) -> Self {
        Self {
            connected: false,
            last_error: Some(error.into()),
        }
    }

    /// Human-readable summary for the /status command
    pub fn summary(&self) -> String {
        let state = if self.connected {
            "🟢 Connected"
        } else {
            "🔴 Disconnected"
        };
        let mut text = format!("*System Status*\nWS Connection: {state}");
        if let Some(error) = &self.last_error {
            text.push_str(&format!("\nLast Error: `{error}`"));
        }
        text
    }
}

pub type StatusTx = watch::Sender<MonitorStatus>;
pub type StatusRx = watch::Receiver<MonitorStatus>;

pub fn status_channel() -> (StatusTx, StatusRx) {
    watch::channel(MonitorStatus::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_published_to_readers() {
        let (tx, rx) = status_channel();
        assert!(!rx.borrow().connected);

        tx.send(MonitorStatus::connected()).expect("send");
        assert!(rx.borrow().connected);
        assert!(rx.borrow().last_error.is_none());

        tx.send(MonitorStatus::disconnected("socket reset"))
            .expect("send");
        assert_eq!(rx.borrow().last_error.as_deref(), Some("socket reset"));
    }

    #[test]
    fn test_summary_includes_last_error() {
        let status = MonitorStatus::disconnected("HTTP 401");
        let summary = status.summary();
        assert!(summary.contains("🔴 Disconnected"));
        assert!(summary.contains("`HTTP 401`"));

        let summary = MonitorStatus::connected().summary();
        assert!(summary.contains("🟢 Connected"));
        assert!(!summary.contains("Last Error"));
    }
}

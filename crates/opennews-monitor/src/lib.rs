/*
[INPUT]:  Crate modules
[OUTPUT]: Public monitor crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod commands;
pub mod config;
pub mod digest;
pub mod monitor;
pub mod status;

pub use commands::CommandListener;
pub use config::MonitorConfig;
pub use monitor::NewsMonitor;
pub use status::{MonitorStatus, status_channel};

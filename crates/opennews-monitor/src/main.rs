/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Running monitor and command-listener tasks with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use opennews_adapter::{ClientConfig, NewsFeedSocket, OpenNewsClient, TelegramClient};
use opennews_monitor::{CommandListener, MonitorConfig, NewsMonitor, status_channel};

#[derive(Parser, Debug)]
#[command(name = "opennews-monitor", version, about = "OpenNews real-time monitor and Telegram bot")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Run the one-shot daily digest instead of the monitor loops
    #[arg(long = "digest")]
    digest: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = MonitorConfig::load(args.config_path.as_deref()).context("load config")?;
    config.validate()?;

    let api = OpenNewsClient::with_config_and_base_url(
        ClientConfig::default(),
        &config.api_base_url,
        &config.api_token,
    )
    .context("build api client")?;
    let telegram = if config.telegram_configured() {
        Some(
            TelegramClient::new(&config.telegram.bot_token, &config.telegram.chat_id)
                .context("build telegram client")?,
        )
    } else {
        None
    };

    if args.digest {
        let telegram = telegram.context("daily digest requires a configured telegram bot")?;
        return opennews_monitor::digest::run_digest(&api, &telegram)
            .await
            .context("daily digest");
    }

    info!("starting opennews-monitor");
    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let (status_tx, status_rx) = status_channel();

    let feed = NewsFeedSocket::new(&config.wss_url, &config.api_token);
    let mut monitor = NewsMonitor::new(feed, telegram.clone(), status_tx);
    let monitor_shutdown = shutdown.clone();
    let monitor_task = tokio::spawn(async move { monitor.run(monitor_shutdown).await });

    let listener_task = if let Some(telegram) = telegram {
        let mut listener = CommandListener::new(telegram, status_rx);
        let listener_shutdown = shutdown.clone();
        Some(tokio::spawn(
            async move { listener.run(listener_shutdown).await },
        ))
    } else {
        warn!("telegram not configured; notifications and command listener disabled");
        None
    };

    shutdown.cancelled().await;
    info!("shutdown signal received");

    monitor_task.await.context("join monitor task")?;
    if let Some(task) = listener_task {
        task.await.context("join command listener task")?;
    }
    info!("shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use tokio::net::TcpListener;
use tokio::sync::watch;

use market_pulse::binance::rest::BinanceRestClient;
use market_pulse::config::Config;
use market_pulse::market::MarketFeed;
use market_pulse::model::symbol::TRACKED_SYMBOLS;
use market_pulse::server;
use market_pulse::ui::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install rustls crypto provider"))?;

    // Load config
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Check config/default.toml and the BINANCE_BASE_URL variable");
            std::process::exit(1);
        }
    };

    // Init tracing (log to file so it doesn't interfere with TUI)
    let log_file = std::fs::File::create("market-pulse.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let settings = config.feed_settings();
    tracing::info!(
        rest_url = %config.binance.rest_base_url,
        interval_secs = config.refresh.interval_secs,
        locale = settings.locale.tag(),
        http = ?config.http.listen_addr,
        "Starting market-pulse"
    );

    let client = Arc::new(
        BinanceRestClient::new(
            &config.binance.rest_base_url,
            config.binance.request_timeout(),
        )
        .context("binance.rest_base_url is invalid")?,
    );
    let feed = MarketFeed::spawn(client, TRACKED_SYMBOLS.to_vec(), settings);
    let mut state_rx = feed.subscribe();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let server_task = match config.http.listen_addr {
        Some(addr) => {
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind http.listen_addr {}", addr))?;
            Some(tokio::spawn(server::serve(
                listener,
                feed.refresher(),
                shutdown_rx.clone(),
            )))
        }
        None => None,
    };

    // Ctrl+C handler
    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    // TUI main loop
    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(feed.state().render_view(&Local));
    app_state.push_log(format!(
        "market-pulse started | {} | {}",
        config.binance.rest_base_url,
        settings.locale.tag()
    ));

    let poll_timeout = Duration::from_millis(config.ui.refresh_rate_ms);
    let board_result = ui::run_board(
        &mut terminal,
        &mut app_state,
        &feed.refresher(),
        &mut state_rx,
        &shutdown_tx,
        || {
            if crossterm::event::poll(poll_timeout)? {
                crossterm::event::read().map(Some)
            } else {
                Ok(None)
            }
        },
    );

    // Restore and stop workers even when the terminal loop failed.
    ratatui::restore();
    let _ = shutdown_tx.send(true);

    feed.shutdown().await;
    if let Some(task) = server_task {
        match task.await {
            Ok(Err(e)) => tracing::warn!(error = %e, "JSON view ended with error"),
            Err(e) => tracing::warn!(error = %e, "JSON view task panicked"),
            Ok(Ok(())) => {}
        }
    }

    if let Err(e) = &board_result {
        tracing::error!(error = %e, "Terminal loop failed");
    }
    board_result?;

    tracing::info!("Shutdown complete");
    println!("Goodbye! Check market-pulse.log for details.");
    Ok(())
}

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tokio::sync::watch;
use tokio_test::{assert_err, assert_ok};

use market_pulse::binance::types::RawTicker;
use market_pulse::error::FetchError;
use market_pulse::market::{
    build_snapshots, DisplayLocale, FeedSettings, MarketFeed, RefreshState, TickerSource,
};
use market_pulse::model::symbol::{TrackedSymbol, TRACKED_SYMBOLS};
use market_pulse::ui::{self, AppState};

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn draw(state: &AppState) -> String {
    let backend = TestBackend::new(100, 24);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    terminal
        .draw(|frame| ui::render(frame, state))
        .expect("render should succeed");
    buffer_text(&terminal)
}

fn market_after_success() -> RefreshState {
    let mut market = RefreshState::new(DisplayLocale::EnUs, &TRACKED_SYMBOLS[..3]);
    market.begin_cycle();
    market.complete_success(
        build_snapshots(
            DisplayLocale::EnUs,
            &TRACKED_SYMBOLS[..3],
            &[
                RawTicker::new("61234.5", "-1.23", "4300000000"),
                RawTicker::new("3012.25", "0.5", "820000000"),
                RawTicker::new("oops", "2", "1"),
            ],
        ),
        Utc.with_ymd_and_hms(2026, 5, 1, 8, 30, 0).unwrap(),
    );
    market
}

#[test]
fn renders_fallback_board_before_first_update() {
    let market = RefreshState::new(DisplayLocale::EnUs, TRACKED_SYMBOLS);
    let state = AppState::new(market.render_view(&Utc));
    let text = draw(&state);

    assert!(text.contains("Awaiting first update"));
    assert!(text.contains("IDLE"));
    assert!(text.contains("Bitcoin"));
    assert!(text.contains("Chainlink"));
    assert!(text.contains("$0.00"));
}

#[test]
fn renders_snapshot_rows_and_degraded_marker() {
    let market = market_after_success();
    let idle = RefreshState::new(DisplayLocale::EnUs, &TRACKED_SYMBOLS[..3]);
    let mut state = AppState::new(idle.render_view(&Utc));
    state.apply_view(market.render_view(&Utc), market.is_stale());
    let text = draw(&state);

    assert!(text.contains("Updated at 08:30:00"));
    assert!(text.contains("$61,234.50"));
    assert!(text.contains("-1.2%"));
    assert!(text.contains("4.3B USDT"));
    assert!(text.contains("Solana *"));
    assert!(!text.contains("Bitcoin *"));
    assert_eq!(state.log_messages.len(), 1);
}

#[test]
fn renders_error_banner_and_stale_title_after_failure() {
    let mut market = market_after_success();
    let mut state = AppState::new(market.render_view(&Utc));

    market.begin_cycle();
    market.complete_failure();
    state.apply_view(market.render_view(&Utc), market.is_stale());
    let text = draw(&state);

    assert!(text.contains("ERROR"));
    assert!(text.contains("Could not refresh Binance prices right now."));
    assert!(text.contains("Market (stale)"));
    assert!(text.contains("$61,234.50"));
    assert!(state
        .log_messages
        .iter()
        .any(|m| m.contains("Could not refresh")));
}

#[test]
fn loading_state_dims_refresh_hint() {
    let mut market = RefreshState::new(DisplayLocale::EnUs, &TRACKED_SYMBOLS[..3]);
    market.begin_cycle();
    let state = AppState::new(market.render_view(&Utc));
    let text = draw(&state);

    assert!(state.is_loading());
    assert!(text.contains("LOADING"));
    assert!(text.contains("[R]efreshing..."));
}

/// Never answers, so the feed stays in its first cycle.
struct SilentSource;

impl TickerSource for SilentSource {
    async fn fetch_snapshot(
        &self,
        _symbols: &[TrackedSymbol],
    ) -> Result<Vec<RawTicker>, FetchError> {
        std::future::pending().await
    }
}

fn key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

struct Board {
    feed: MarketFeed,
    terminal: Terminal<TestBackend>,
    state: AppState,
    state_rx: watch::Receiver<RefreshState>,
}

fn board() -> Board {
    let settings = FeedSettings {
        locale: DisplayLocale::EnUs,
        ..FeedSettings::default()
    };
    let feed = MarketFeed::spawn(Arc::new(SilentSource), TRACKED_SYMBOLS.to_vec(), settings);
    let state = AppState::new(feed.state().render_view(&Utc));
    let state_rx = feed.subscribe();
    Board {
        feed,
        terminal: Terminal::new(TestBackend::new(100, 24)).expect("test terminal"),
        state,
        state_rx,
    }
}

#[tokio::test]
async fn board_loop_hands_terminal_errors_back_to_caller() {
    let mut b = board();
    let (shutdown_tx, _shutdown_rx) = watch::channel(false);

    let result = ui::run_board(
        &mut b.terminal,
        &mut b.state,
        &b.feed.refresher(),
        &mut b.state_rx,
        &shutdown_tx,
        || Err(std::io::Error::other("tty gone")),
    );

    let err = assert_err!(result);
    assert!(err.to_string().contains("tty gone"));
    assert!(buffer_text(&b.terminal).contains("Bitcoin"));
    b.feed.shutdown().await;
}

#[tokio::test]
async fn board_loop_quit_key_signals_shutdown() {
    let mut b = board();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let result = ui::run_board(
        &mut b.terminal,
        &mut b.state,
        &b.feed.refresher(),
        &mut b.state_rx,
        &shutdown_tx,
        || Ok(Some(key('q'))),
    );

    assert_ok!(result);
    assert!(*shutdown_rx.borrow());
    b.feed.shutdown().await;
}

#[tokio::test]
async fn board_loop_refresh_key_then_external_shutdown() {
    let mut b = board();
    let (shutdown_tx, _shutdown_rx) = watch::channel(false);
    let mut calls = 0;

    let result = ui::run_board(
        &mut b.terminal,
        &mut b.state,
        &b.feed.refresher(),
        &mut b.state_rx,
        &shutdown_tx,
        || {
            calls += 1;
            if calls == 1 {
                Ok(Some(key('r')))
            } else {
                let _ = shutdown_tx.send(true);
                Ok(None)
            }
        },
    );

    assert_ok!(result);
    assert_eq!(calls, 2);
    assert!(b
        .state
        .log_messages
        .iter()
        .any(|m| m == "Manual refresh requested"));
    b.feed.shutdown().await;
}

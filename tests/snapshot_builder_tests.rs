use market_pulse::binance::types::RawTicker;
use market_pulse::market::{build_snapshots, fallback_snapshots, DisplayLocale};
use market_pulse::model::snapshot::Trend;
use market_pulse::model::symbol::{TrackedSymbol, TRACKED_SYMBOLS};

const PT: DisplayLocale = DisplayLocale::PtBr;

fn healthy_tickers(n: usize) -> Vec<RawTicker> {
    (0..n)
        .map(|i| RawTicker::new(&format!("{}.5", 100 + i), "1.5", "1000000"))
        .collect()
}

#[test]
fn output_matches_registry_length_and_order() {
    let tickers = healthy_tickers(TRACKED_SYMBOLS.len());
    let snapshots = build_snapshots(PT, TRACKED_SYMBOLS, &tickers);

    assert_eq!(snapshots.len(), TRACKED_SYMBOLS.len());
    for (snap, sym) in snapshots.iter().zip(TRACKED_SYMBOLS) {
        assert_eq!(snap.name, sym.display_name);
        assert_eq!(snap.symbol, sym.display_symbol);
    }
    assert_eq!(snapshots[0].price, "US$\u{a0}100,50");
    assert_eq!(snapshots[8].price, "US$\u{a0}108,50");
}

#[test]
fn formats_reference_btc_ticker() {
    let tickers = vec![RawTicker::new("61234.5", "-1.23", "4300000000")];
    let snap = &build_snapshots(PT, &TRACKED_SYMBOLS[..1], &tickers)[0];

    assert_eq!(snap.name, "Bitcoin");
    assert_eq!(snap.symbol, "BTC");
    assert_eq!(snap.price, "US$\u{a0}61.234,50");
    assert_eq!(snap.change_percent, "-1,2%");
    assert_eq!(snap.trend, Trend::Down);
    assert_eq!(snap.volume, "4,3B USDT");
    assert!(!snap.degraded);
}

#[test]
fn zero_change_classifies_as_up() {
    for raw in ["0", "0.000", "-0.0"] {
        let tickers = vec![RawTicker::new("1", raw, "1")];
        let snap = &build_snapshots(PT, &TRACKED_SYMBOLS[..1], &tickers)[0];
        assert_eq!(snap.trend, Trend::Up, "change {raw:?}");
        assert_eq!(snap.change_percent, "+0,0%");
    }
}

#[test]
fn unparsable_price_renders_zero_and_flags_degraded() {
    let tickers = vec![RawTicker::new("not-a-number", "2.0", "820000000")];
    let snap = &build_snapshots(PT, &TRACKED_SYMBOLS[..1], &tickers)[0];

    assert_eq!(snap.price, "US$\u{a0}0,00");
    assert_eq!(snap.change_percent, "+2,0%");
    assert_eq!(snap.volume, "820M USDT");
    assert!(snap.degraded);
}

#[test]
fn empty_fields_degrade_to_fallback_values() {
    let snap = &build_snapshots(PT, &TRACKED_SYMBOLS[..1], &[RawTicker::default()])[0];
    assert_eq!(snap.price, "US$\u{a0}0,00");
    assert_eq!(snap.change_percent, "+0,0%");
    assert_eq!(snap.trend, Trend::Up);
    assert_eq!(snap.volume, "0 USDT");
    assert!(snap.degraded);
}

#[test]
fn volume_suffix_comes_from_registry_quote_asset() {
    let symbols = [TrackedSymbol {
        external_id: "ETHBTC",
        display_name: "Ethereum",
        display_symbol: "ETH",
        quote_asset: "BTC",
    }];
    let snap = &build_snapshots(PT, &symbols, &[RawTicker::new("0.05", "1", "1520.4")])[0];
    assert_eq!(snap.volume, "1,5K BTC");
}

#[test]
#[should_panic(expected = "index-aligned")]
fn length_mismatch_is_a_contract_violation() {
    build_snapshots(PT, &TRACKED_SYMBOLS[..3], &healthy_tickers(2));
}

#[test]
fn fallback_mirrors_registry_with_neutral_values() {
    let fallback = fallback_snapshots(PT, TRACKED_SYMBOLS);
    assert_eq!(fallback.len(), TRACKED_SYMBOLS.len());
    for (snap, sym) in fallback.iter().zip(TRACKED_SYMBOLS) {
        assert_eq!(snap.name, sym.display_name);
        assert_eq!(snap.price, "US$\u{a0}0,00");
        assert_eq!(snap.change_percent, "+0,0%");
        assert_eq!(snap.trend, Trend::Up);
        assert_eq!(snap.volume, "0 USDT");
        assert!(!snap.degraded);
    }
}

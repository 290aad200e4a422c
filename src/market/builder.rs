use crate::binance::types::RawTicker;
use crate::model::snapshot::{AssetSnapshot, Trend};
use crate::model::symbol::TrackedSymbol;

use super::format::{
    format_change_percent, format_price, format_volume, parse_decimal, DisplayLocale,
};

/// Zip the registry with one cycle's tickers into display rows.
///
/// `tickers` must be index-aligned with `symbols`; a length mismatch is a bug
/// in the caller and panics. Unparsable numbers render as zero and mark the
/// row `degraded`.
pub fn build_snapshots(
    locale: DisplayLocale,
    symbols: &[TrackedSymbol],
    tickers: &[RawTicker],
) -> Vec<AssetSnapshot> {
    assert_eq!(
        symbols.len(),
        tickers.len(),
        "ticker batch must be index-aligned with the registry"
    );

    symbols
        .iter()
        .zip(tickers)
        .map(|(symbol, ticker)| build_snapshot(locale, symbol, ticker))
        .collect()
}

pub fn build_snapshot(
    locale: DisplayLocale,
    symbol: &TrackedSymbol,
    ticker: &RawTicker,
) -> AssetSnapshot {
    let price = parse_decimal(&ticker.last_price);
    let change = parse_decimal(&ticker.price_change_percent);
    let volume = parse_decimal(&ticker.quote_volume);
    let degraded = price.is_none() || change.is_none() || volume.is_none();
    if degraded {
        tracing::debug!(
            symbol = symbol.external_id,
            last_price = %ticker.last_price,
            price_change_percent = %ticker.price_change_percent,
            quote_volume = %ticker.quote_volume,
            "Ticker carried unparsable numbers, rendering zeros"
        );
    }

    let change = change.unwrap_or(0.0);
    AssetSnapshot {
        name: symbol.display_name.to_string(),
        symbol: symbol.display_symbol.to_string(),
        price: format_price(locale, price.unwrap_or(0.0)),
        change_percent: format_change_percent(locale, change),
        trend: Trend::from_change(change),
        volume: format_volume(locale, volume.unwrap_or(0.0), symbol.quote_asset),
        degraded,
    }
}

/// Placeholder rows shown before the first successful cycle.
pub fn fallback_snapshots(locale: DisplayLocale, symbols: &[TrackedSymbol]) -> Vec<AssetSnapshot> {
    symbols
        .iter()
        .map(|symbol| AssetSnapshot {
            name: symbol.display_name.to_string(),
            symbol: symbol.display_symbol.to_string(),
            price: format_price(locale, 0.0),
            change_percent: format_change_percent(locale, 0.0),
            trend: Trend::Up,
            volume: format_volume(locale, 0.0, symbol.quote_asset),
            degraded: false,
        })
        .collect()
}

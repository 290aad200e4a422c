/// One trading pair shown on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedSymbol {
    /// Exchange identifier, e.g. `BTCUSDT`.
    pub external_id: &'static str,
    pub display_name: &'static str,
    pub display_symbol: &'static str,
    /// Quote currency code appended to volumes.
    pub quote_asset: &'static str,
}

impl TrackedSymbol {
    pub const fn usdt(
        external_id: &'static str,
        display_name: &'static str,
        display_symbol: &'static str,
    ) -> Self {
        Self {
            external_id,
            display_name,
            display_symbol,
            quote_asset: "USDT",
        }
    }
}

/// Render order of the board.
pub const TRACKED_SYMBOLS: &[TrackedSymbol] = &[
    TrackedSymbol::usdt("BTCUSDT", "Bitcoin", "BTC"),
    TrackedSymbol::usdt("ETHUSDT", "Ethereum", "ETH"),
    TrackedSymbol::usdt("SOLUSDT", "Solana", "SOL"),
    TrackedSymbol::usdt("BNBUSDT", "BNB", "BNB"),
    TrackedSymbol::usdt("XRPUSDT", "XRP", "XRP"),
    TrackedSymbol::usdt("ADAUSDT", "Cardano", "ADA"),
    TrackedSymbol::usdt("DOGEUSDT", "Dogecoin", "DOGE"),
    TrackedSymbol::usdt("AVAXUSDT", "Avalanche", "AVAX"),
    TrackedSymbol::usdt("LINKUSDT", "Chainlink", "LINK"),
];

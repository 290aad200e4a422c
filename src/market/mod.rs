pub mod builder;
pub mod format;
pub mod scheduler;
pub mod state;

use std::future::Future;

use crate::binance::types::RawTicker;
use crate::error::FetchError;
use crate::model::symbol::TrackedSymbol;

pub use builder::{build_snapshots, fallback_snapshots};
pub use format::DisplayLocale;
pub use scheduler::{FeedSettings, MarketFeed, RefreshRequest, Refresher};
pub use state::{RefreshState, RefreshStatus, RenderView};

/// Where a refresh cycle gets its tickers from.
///
/// Implementations return one ticker per symbol, index-aligned with `symbols`,
/// or fail the whole batch.
pub trait TickerSource: Send + Sync + 'static {
    fn fetch_snapshot(
        &self,
        symbols: &[TrackedSymbol],
    ) -> impl Future<Output = Result<Vec<RawTicker>, FetchError>> + Send;
}

use thiserror::Error;

/// Failure of one refresh cycle's fetch phase.
///
/// Any single symbol failing aborts the whole cycle, so both variants carry
/// the symbol that tripped it.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("ticker request for {symbol} failed: {source}")]
    Transport {
        symbol: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("ticker request for {symbol} returned HTTP {status}")]
    HttpStatus { symbol: String, status: u16 },
}

impl FetchError {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Transport { symbol, .. } | Self::HttpStatus { symbol, .. } => symbol,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("unsupported display locale '{0}', expected pt-BR or en-US")]
    Locale(String),
}

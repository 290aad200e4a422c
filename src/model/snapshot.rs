use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Zero counts as `Up`; there is no neutral trend.
    pub fn from_change(change_percent: f64) -> Self {
        if change_percent >= 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// Display-ready state of one asset. Rebuilt wholesale every successful cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSnapshot {
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change_percent: String,
    pub trend: Trend,
    pub volume: String,
    /// Set when a numeric field failed to parse and was shown as zero.
    pub degraded: bool,
}

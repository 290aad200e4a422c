use serde::Deserialize;

/// Keep a Binance decimal field as text, whatever JSON shape it arrives in.
///
/// Strings pass through, numbers keep their textual form, `null` becomes an
/// empty string. Anything else is left for the snapshot builder to zero out.
pub fn decimal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    Ok(match v {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

/// 24h rolling ticker (GET /api/v3/ticker/24hr?symbol=...).
///
/// Only the fields the board renders are kept. Values are untrusted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTicker {
    #[serde(default, deserialize_with = "decimal_text")]
    pub last_price: String,
    #[serde(default, deserialize_with = "decimal_text")]
    pub price_change_percent: String,
    #[serde(default, deserialize_with = "decimal_text")]
    pub quote_volume: String,
}

impl RawTicker {
    pub fn new(last_price: &str, price_change_percent: &str, quote_volume: &str) -> Self {
        Self {
            last_price: last_price.to_string(),
            price_change_percent: price_change_percent.to_string(),
            quote_volume: quote_volume.to_string(),
        }
    }
}

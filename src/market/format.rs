//! Locale-aware rendering of prices, percentages, volumes and freshness labels.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::Deserialize;

use crate::error::AppError;

/// Short-scale compact units, smallest first.
const COMPACT_UNITS: [(f64, &str); 5] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

/// Enough fractional digits to print any finite f64 exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum DisplayLocale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
}

impl FromStr for DisplayLocale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "pt-br" => Ok(Self::PtBr),
            "en-us" => Ok(Self::EnUs),
            _ => Err(AppError::Locale(s.to_string())),
        }
    }
}

impl DisplayLocale {
    pub fn tag(self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::EnUs => "en-US",
        }
    }

    pub fn decimal_separator(self) -> char {
        match self {
            Self::PtBr => ',',
            Self::EnUs => '.',
        }
    }

    pub fn group_separator(self) -> char {
        match self {
            Self::PtBr => '.',
            Self::EnUs => ',',
        }
    }

    fn usd_prefix(self) -> &'static str {
        match self {
            Self::PtBr => "US$\u{a0}",
            Self::EnUs => "$",
        }
    }

    pub fn awaiting_update_label(self) -> &'static str {
        match self {
            Self::PtBr => "Aguardando primeira atualizacao",
            Self::EnUs => "Awaiting first update",
        }
    }

    fn updated_at_prefix(self) -> &'static str {
        match self {
            Self::PtBr => "Atualizado as",
            Self::EnUs => "Updated at",
        }
    }

    /// Fixed, non-technical message shown while the board is stale.
    pub fn refresh_error_message(self) -> &'static str {
        match self {
            Self::PtBr => {
                "Nao foi possivel atualizar os precos da Binance agora. Exibindo ultima leitura."
            }
            Self::EnUs => "Could not refresh Binance prices right now. Showing the last reading.",
        }
    }
}

/// Parse an exchange decimal string. `None` for anything unparsable or non-finite.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `US$ 61.234,50` (pt-BR) or `$61,234.50` (en-US).
pub fn format_price(locale: DisplayLocale, value: f64) -> String {
    let value = finite_or_zero(value);
    let body = format_grouped(locale, value.abs(), 2);
    format!("{}{}{}", sign_prefix(value, &body), locale.usd_prefix(), body)
}

/// Always signed, one fractional digit: `+0,0%`, `-1,2%`.
pub fn format_change_percent(locale: DisplayLocale, value: f64) -> String {
    let value = finite_or_zero(value);
    let sign = if value >= 0.0 { '+' } else { '-' };
    format!("{}{}%", sign, format_grouped(locale, value.abs(), 1))
}

/// Compact short-scale notation with at most one fractional digit: `4,3B`, `820M`.
pub fn format_compact(locale: DisplayLocale, value: f64) -> String {
    let value = finite_or_zero(value);
    let magnitude = value.abs();

    let mut unit = COMPACT_UNITS
        .iter()
        .rposition(|&(scale, _)| magnitude >= scale)
        .unwrap_or(0);
    let mut fixed = round_half_away(magnitude / COMPACT_UNITS[unit].0, 1);
    // 999.96K rounds to 1000.0K and is shown as 1M.
    while integer_digits(&fixed) > 3 && unit + 1 < COMPACT_UNITS.len() {
        unit += 1;
        fixed = round_half_away(magnitude / COMPACT_UNITS[unit].0, 1);
    }

    let mut body = group_fixed(locale, &fixed);
    let zero_fraction = format!("{}0", locale.decimal_separator());
    if body.ends_with(&zero_fraction) {
        body.truncate(body.len() - zero_fraction.len());
    }
    format!("{}{}{}", sign_prefix(value, &body), body, COMPACT_UNITS[unit].1)
}

pub fn format_volume(locale: DisplayLocale, value: f64, quote_asset: &str) -> String {
    format!("{} {}", format_compact(locale, value), quote_asset)
}

/// Freshness line for the board header.
pub fn updated_label<Tz>(locale: DisplayLocale, last_updated_at: Option<&DateTime<Tz>>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match last_updated_at {
        None => locale.awaiting_update_label().to_string(),
        Some(at) => format!("{} {}", locale.updated_at_prefix(), at.format("%H:%M:%S")),
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// A minus sign only when the rendered magnitude is not all zeros.
fn sign_prefix(value: f64, body: &str) -> &'static str {
    if value < 0.0 && body.chars().any(|c| matches!(c, '1'..='9')) {
        "-"
    } else {
        ""
    }
}

/// Fixed-point rendering of a non-negative value with locale grouping.
fn format_grouped(locale: DisplayLocale, value: f64, decimals: usize) -> String {
    group_fixed(locale, &round_half_away(value, decimals))
}

/// Round a non-negative value to `decimals` places, ties away from zero.
///
/// Works on the exact decimal expansion so `0.125` becomes `0.13` and a value
/// stored just below a tie (`0.15` is `0.1499..`) still rounds down.
fn round_half_away(value: f64, decimals: usize) -> String {
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value);
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let round_up = frac_part.as_bytes().get(decimals).is_some_and(|d| *d >= b'5');

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .collect();
    if round_up {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - decimals;
    let mut fixed = String::from_utf8_lossy(&digits[..split]).into_owned();
    if decimals > 0 {
        fixed.push('.');
        fixed.push_str(&String::from_utf8_lossy(&digits[split..]));
    }
    fixed
}

fn integer_digits(fixed: &str) -> usize {
    fixed.split_once('.').map_or(fixed.len(), |(i, _)| i.len())
}

/// Apply locale separators to a `1234.5` style fixed-point string.
fn group_fixed(locale: DisplayLocale, fixed: &str) -> String {
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed, None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(locale.group_separator());
        }
        out.push(digit);
    }
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator());
        out.push_str(frac);
    }
    out
}

use std::fmt::Display;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::Serialize;

use crate::model::snapshot::AssetSnapshot;
use crate::model::symbol::TrackedSymbol;

use super::builder::fallback_snapshots;
use super::format::{updated_label, DisplayLocale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStatus {
    Idle,
    Loading,
    Ok,
    Error,
}

impl RefreshStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Loading => "LOADING",
            Self::Ok => "OK",
            Self::Error => "ERROR",
        }
    }
}

/// The board's market state. Only the feed task writes it.
///
/// `snapshots` is never empty: it starts as the registry fallback and is only
/// ever replaced wholesale by a successful cycle. `last_updated_at` only moves
/// forward.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshState {
    locale: DisplayLocale,
    status: RefreshStatus,
    snapshots: Vec<AssetSnapshot>,
    error_message: Option<String>,
    last_updated_at: Option<DateTime<Utc>>,
}

impl RefreshState {
    pub fn new(locale: DisplayLocale, symbols: &[TrackedSymbol]) -> Self {
        Self {
            locale,
            status: RefreshStatus::Idle,
            snapshots: fallback_snapshots(locale, symbols),
            error_message: None,
            last_updated_at: None,
        }
    }

    pub fn locale(&self) -> DisplayLocale {
        self.locale
    }

    pub fn status(&self) -> RefreshStatus {
        self.status
    }

    pub fn snapshots(&self) -> &[AssetSnapshot] {
        &self.snapshots
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated_at
    }

    pub fn is_loading(&self) -> bool {
        self.status == RefreshStatus::Loading
    }

    /// Showing an older successful reading because the latest cycle failed.
    pub fn is_stale(&self) -> bool {
        self.status == RefreshStatus::Error && self.last_updated_at.is_some()
    }

    /// Enter `Loading`. Returns `false` (and changes nothing) while a cycle is
    /// already in flight.
    pub fn begin_cycle(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.status = RefreshStatus::Loading;
        self.error_message = None;
        true
    }

    pub fn complete_success(&mut self, snapshots: Vec<AssetSnapshot>, now: DateTime<Utc>) {
        let updated_at = match self.last_updated_at {
            Some(prev) if now <= prev => prev + TimeDelta::milliseconds(1),
            _ => now,
        };
        self.snapshots = snapshots;
        self.last_updated_at = Some(updated_at);
        self.error_message = None;
        self.status = RefreshStatus::Ok;
    }

    /// Keep the last snapshots and timestamp; surface the fixed message.
    pub fn complete_failure(&mut self) {
        self.error_message = Some(self.locale.refresh_error_message().to_string());
        self.status = RefreshStatus::Error;
    }

    /// Presentation-facing projection, with the freshness label rendered in `tz`.
    pub fn render_view<Tz>(&self, tz: &Tz) -> RenderView
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let local = self.last_updated_at.map(|at| at.with_timezone(tz));
        RenderView {
            snapshots: self.snapshots.clone(),
            status: self.status,
            error_message: self.error_message.clone(),
            updated_label: updated_label(self.locale, local.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderView {
    pub snapshots: Vec<AssetSnapshot>,
    pub status: RefreshStatus,
    pub error_message: Option<String>,
    pub updated_label: String,
}

use std::collections::BTreeMap;

use axum::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A representation of a price starting at a certain moment in time.
/// Prices are EUR/MWh once the series has passed the unit normalizer.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct PricePoint {
    #[serde(rename = "ts")]
    pub(crate) moment: DateTime<Utc>,
    pub(crate) price: f64,
}

/// An untrusted candidate point as it comes out of the parse boundary.
/// Anything here may be missing or garbage; the sanitizer decides.
#[derive(Deserialize, Debug, Clone, Default)]
pub(crate) struct RawRecord {
    #[serde(default)]
    pub(crate) ts: Option<String>,
    #[serde(default)]
    pub(crate) price: Option<f64>,
}

/// Marks whether a dataset was fetched from the market or synthesized.
/// Demo data must never be presented as live.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum Provenance {
    Live,
    Demo,
}

/// The aggregated document served to the dashboard: one series per requested
/// country plus the combined validation verdict.
#[derive(Serialize, Debug)]
pub(crate) struct DayAhead {
    pub(crate) source: Provenance,
    pub(crate) ok: bool,
    pub(crate) issues: Vec<String>,
    pub(crate) data: BTreeMap<String, Vec<PricePoint>>,
}

#[async_trait]
pub(crate) trait DayAheadProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch today's raw day-ahead points for one bidding zone.
    async fn fetch_day_ahead(&self, zone: &str) -> Result<Vec<RawRecord>, ProviderError>;
}

#[derive(Debug, Clone, Error)]
pub(crate) enum ProviderError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

use std::time::Duration;

use axum::async_trait;
use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use log::info;
use reqwest::Client;
use serde_derive::Deserialize;
use tokio::time::sleep;
use tracing::warn;
use url::Url;

use crate::domain::{DayAheadProvider, ProviderError, RawRecord};

const API_URL: &str = "https://transparency.entsoe.eu/api";
/// A44 is the day-ahead price document type.
const DOCUMENT_TYPE: &str = "A44";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 250;

/// Day-ahead prices from the ENTSO-E transparency platform.
#[derive(Clone, Debug)]
pub(crate) struct Entsoe {
    token: String,
    client: Client,
}

impl Entsoe {
    pub(crate) fn new(token: String) -> Self {
        Self {
            token,
            client: Client::new(),
        }
    }

    fn day_ahead_url(&self, zone: &str) -> Result<Url, ProviderError> {
        let (start, end) = today_window();
        Url::parse_with_params(
            API_URL,
            &[
                ("documentType", DOCUMENT_TYPE),
                ("in_Domain", zone),
                ("out_Domain", zone),
                ("periodStart", &period_timestamp(start)),
                ("periodEnd", &period_timestamp(end)),
                ("securityToken", &self.token),
            ],
        )
        .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }

    /// One GET with a bounded timeout. Transient failures are retried with
    /// exponential backoff; a non-retryable HTTP status fails immediately.
    async fn fetch_document(&self, url: Url) -> Result<MarketDocument, ProviderError> {
        let mut backoff = INITIAL_BACKOFF_MS;
        let mut last_error = String::new();

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                sleep(Duration::from_millis(backoff)).await;
                backoff *= 2;
            }

            let response = self
                .client
                .get(url.clone())
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<MarketDocument>()
                            .await
                            .map_err(|e| ProviderError::Unavailable(e.to_string()));
                    }
                    if status.is_server_error() || status.as_u16() == 429 {
                        warn!("entsoe returned {} (attempt {})", status, attempt + 1);
                        last_error = format!("status {}", status);
                        continue;
                    }
                    return Err(ProviderError::Unavailable(format!("status {}", status)));
                }
                Err(e) => {
                    warn!("entsoe request failed (attempt {}): {}", attempt + 1, e);
                    last_error = e.to_string();
                }
            }
        }

        Err(ProviderError::Unavailable(last_error))
    }
}

#[async_trait]
impl DayAheadProvider for Entsoe {
    fn name(&self) -> &'static str {
        "entsoe"
    }

    async fn fetch_day_ahead(&self, zone: &str) -> Result<Vec<RawRecord>, ProviderError> {
        info!("Fetching day-ahead prices for zone {}", zone);

        let url = self.day_ahead_url(zone)?;
        let document = self.fetch_document(url).await?;
        let records = flatten_document(document);

        info!("Fetched {} raw points for zone {}", records.len(), zone);

        Ok(records)
    }
}

/// Today's publication window: 00:00 to 23:59 UTC.
fn today_window() -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc::now()
        .with_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap())
        .unwrap();
    let end = start + chrono::Duration::hours(24) - chrono::Duration::minutes(1);
    (start, end)
}

fn period_timestamp(moment: DateTime<Utc>) -> String {
    moment.format("%Y%m%d%H%M").to_string()
}

/// Flatten the nested market document into nominal records: within each
/// period, a point's timestamp is the interval start plus its zero-based
/// index in hours. Shape and range checks are the sanitizer's job; the only
/// thing dropped here is a period whose interval start cannot be read.
fn flatten_document(document: MarketDocument) -> Vec<RawRecord> {
    let Some(publication) = document.publication else {
        return vec![];
    };

    let mut records = Vec::new();
    for time_series in publication.time_series.into_vec() {
        for period in time_series.periods.into_vec() {
            let Some(start) = period
                .time_interval
                .as_ref()
                .and_then(|interval| parse_interval_start(&interval.start))
            else {
                continue;
            };
            for (index, point) in period.points.into_vec().into_iter().enumerate() {
                let moment = start + chrono::Duration::hours(index as i64);
                records.push(RawRecord {
                    ts: Some(moment.to_rfc3339()),
                    price: point.price_amount,
                });
            }
        }
    }
    records
}

/// Interval starts arrive as RFC 3339 or minute-precision `2024-06-14T22:00Z`.
fn parse_interval_start(start: &str) -> Option<DateTime<Utc>> {
    if let Ok(moment) = DateTime::parse_from_rfc3339(start) {
        return Some(moment.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(start, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// The document nests series and periods that may arrive as one object or a
/// list, depending on how many the day carries.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(vec![])
    }
}

#[derive(Deserialize, Debug)]
struct MarketDocument {
    #[serde(rename = "Publication_MarketDocument")]
    publication: Option<Publication>,
}

#[derive(Deserialize, Debug)]
struct Publication {
    #[serde(rename = "TimeSeries", default)]
    time_series: OneOrMany<TimeSeries>,
}

#[derive(Deserialize, Debug)]
struct TimeSeries {
    #[serde(rename = "Period", default)]
    periods: OneOrMany<Period>,
}

#[derive(Deserialize, Debug)]
struct Period {
    #[serde(rename = "timeInterval")]
    time_interval: Option<TimeInterval>,
    #[serde(rename = "Point", default)]
    points: OneOrMany<Point>,
}

#[derive(Deserialize, Debug)]
struct TimeInterval {
    start: String,
}

#[derive(Deserialize, Debug)]
struct Point {
    #[serde(rename = "price.amount", default)]
    price_amount: Option<f64>,
}

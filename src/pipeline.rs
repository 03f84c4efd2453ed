use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use crate::domain::{DayAhead, DayAheadProvider, PricePoint, Provenance, RawRecord};
use crate::fallback::demo_dataset;
use crate::normalize::normalize_units;
use crate::sanitize::sanitize;
use crate::validate::validate_series;
use crate::zones::zone_for;

enum Fetch {
    Points(Vec<RawRecord>),
    UnknownCountry,
    Failed,
}

/// Build the aggregated day-ahead document for a set of country codes.
///
/// Fetches fan out, one future per country, and all of them are awaited
/// before aggregation; a failure in one country resolves to an empty series
/// for that country and never cancels the others. Only when no requested
/// zone yields any raw points at all does the whole batch switch to the
/// synthetic dataset, marked `DEMO`.
#[instrument(skip(provider))]
pub(crate) async fn assemble_day_ahead(
    provider: &dyn DayAheadProvider,
    countries: &[String],
) -> DayAhead {
    let fetches = countries.iter().map(|country| async move {
        let outcome = match zone_for(country) {
            None => {
                warn!("no zone for country {}, serving empty series", country);
                Fetch::UnknownCountry
            }
            Some(zone) => match provider.fetch_day_ahead(zone).await {
                Ok(records) => Fetch::Points(records),
                Err(e) => {
                    error!("fetch for {} failed: {}", country, e);
                    Fetch::Failed
                }
            },
        };
        (country.clone(), outcome)
    });

    let outcomes = join_all(fetches).await;

    let any_known_zone = outcomes
        .iter()
        .any(|(_, outcome)| !matches!(outcome, Fetch::UnknownCountry));
    let any_points = outcomes
        .iter()
        .any(|(_, outcome)| matches!(outcome, Fetch::Points(records) if !records.is_empty()));

    let (source, data) = if any_known_zone && !any_points {
        warn!("no live data for any requested country, serving demo dataset");
        (Provenance::Demo, demo_dataset(countries))
    } else {
        let mut data: BTreeMap<String, Vec<PricePoint>> = BTreeMap::new();
        for (country, outcome) in outcomes {
            let series = match outcome {
                Fetch::Points(records) => {
                    let sanitized = sanitize(&records);
                    if sanitized.dropped > 0 {
                        info!(
                            "dropped {} malformed records for {}",
                            sanitized.dropped, country
                        );
                    }
                    normalize_units(sanitized.series)
                }
                Fetch::UnknownCountry | Fetch::Failed => vec![],
            };
            data.insert(country, series);
        }
        (Provenance::Live, data)
    };

    let mut issues = Vec::new();
    for (country, series) in &data {
        let validation = validate_series(series);
        issues.extend(
            validation
                .issues
                .into_iter()
                .map(|issue| format!("{}: {}", country, issue)),
        );
    }

    DayAhead {
        source,
        ok: issues.is_empty(),
        issues,
        data,
    }
}

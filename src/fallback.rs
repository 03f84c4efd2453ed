use std::collections::BTreeMap;
use std::f64::consts::TAU;

use axum::async_trait;
use chrono::{Duration, Local, NaiveTime};
use rand::Rng;

use crate::domain::{DayAheadProvider, PricePoint, ProviderError, RawRecord};

/// Synthesize a full day of plausible prices for every requested country:
/// 24 hourly points from local midnight, a diurnal sine per country plus a
/// little noise. Callers must pair this with `Provenance::Demo`; synthetic
/// data is never allowed to look like a fetch result.
pub(crate) fn demo_dataset(countries: &[String]) -> BTreeMap<String, Vec<PricePoint>> {
    let midnight = Local::now()
        .with_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap())
        .unwrap();

    let mut rng = rand::thread_rng();
    let mut data = BTreeMap::new();

    for country in countries {
        let (phase, base, amplitude) = diurnal_shape(country);
        let series = (0..24)
            .map(|hour| PricePoint {
                moment: (midnight + Duration::hours(hour)).to_utc(),
                price: base
                    + amplitude * ((hour as f64 + phase) / 24.0 * TAU).sin()
                    + rng.gen_range(-2.0..2.0),
            })
            .collect();
        data.insert(country.clone(), series);
    }

    data
}

/// Per-country wave parameters: (phase offset in hours, base, amplitude).
fn diurnal_shape(country: &str) -> (f64, f64, f64) {
    match country {
        "FI" => (0.0, 45.0, 20.0),
        "SE" => (4.0, 46.0, 18.0),
        "NO" => (8.0, 30.0, 15.0),
        "DK" => (2.0, 48.0, 22.0),
        _ => (6.0, 40.0, 18.0),
    }
}

/// A provider for deployments without upstream credentials. Every fetch
/// fails, so the pipeline serves demo data end to end.
#[derive(Clone, Debug)]
pub(crate) struct OfflineProvider;

#[async_trait]
impl DayAheadProvider for OfflineProvider {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn fetch_day_ahead(&self, _zone: &str) -> Result<Vec<RawRecord>, ProviderError> {
        Err(ProviderError::Unavailable(
            "demo provider has no upstream".to_string(),
        ))
    }
}

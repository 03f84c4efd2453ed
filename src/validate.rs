use crate::domain::PricePoint;

const EXPECTED_HOURLY_POINTS: usize = 24;
const MIN_PLAUSIBLE_PRICE: f64 = -50.0;
const MAX_PLAUSIBLE_PRICE: f64 = 1000.0;
const SPIKE_MEDIAN_FACTOR: f64 = 3.0;

#[derive(Debug, Clone)]
pub(crate) struct Validation {
    pub(crate) ok: bool,
    pub(crate) issues: Vec<String>,
}

/// Run all sanity rules over one sanitized series and report every failure.
/// Purely advisory: the caller keeps serving the series either way.
pub(crate) fn validate_series(series: &[PricePoint]) -> Validation {
    let mut issues = Vec::new();

    if series.len() < EXPECTED_HOURLY_POINTS {
        issues.push(format!(
            "expected ≥{} hourly points, got {}",
            EXPECTED_HOURLY_POINTS,
            series.len()
        ));
    }

    if series.iter().any(|p| p.price < MIN_PLAUSIBLE_PRICE) {
        issues.push(format!("extreme negative (< {})", MIN_PLAUSIBLE_PRICE));
    }

    if series.iter().any(|p| p.price > MAX_PLAUSIBLE_PRICE) {
        issues.push(format!("extreme positive (> {})", MAX_PLAUSIBLE_PRICE));
    }

    // no median is defined for an empty series; the coverage rule already fired
    if let Some(median) = median_price(series) {
        if series
            .iter()
            .any(|p| p.price > SPIKE_MEDIAN_FACTOR * median)
        {
            issues.push(format!("spike > 3× median ({:.1})", median));
        }
    }

    Validation {
        ok: issues.is_empty(),
        issues,
    }
}

/// Sorted-position median: the element at index n/2. No interpolation for
/// even counts.
fn median_price(series: &[PricePoint]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    let mut prices: Vec<f64> = series.iter().map(|p| p.price).collect();
    prices.sort_by(|a, b| a.total_cmp(b));
    Some(prices[prices.len() / 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                moment: start + Duration::hours(i as i64),
                price,
            })
            .collect()
    }

    #[test]
    fn test_clean_full_day_passes() {
        let prices: Vec<f64> = (0..24).map(|h| 40.0 + h as f64).collect();
        let result = validate_series(&series(&prices));

        assert!(result.ok);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_short_series_reports_coverage() {
        let prices: Vec<f64> = (0..10).map(|h| 40.0 + h as f64).collect();
        let result = validate_series(&series(&prices));

        assert!(!result.ok);
        assert!(result.issues[0].contains("10"));
        assert!(result.issues[0].contains("24"));
    }

    #[test]
    fn test_spike_above_triple_median_is_flagged() {
        let mut prices = vec![50.0; 23];
        prices.push(9999.0);
        let result = validate_series(&series(&prices));

        let spike = result
            .issues
            .iter()
            .find(|issue| issue.contains("spike"))
            .expect("spike issue expected");
        assert!(spike.contains("50.0"));
    }

    #[test]
    fn test_all_failing_rules_are_reported() {
        let result = validate_series(&series(&[-80.0, 2000.0, 10.0]));

        assert!(!result.ok);
        // coverage, extreme negative, extreme positive, spike
        assert_eq!(result.issues.len(), 4);
    }

    #[test]
    fn test_empty_series_skips_spike_rule() {
        let result = validate_series(&[]);

        assert!(!result.ok);
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].contains("got 0"));
    }

    #[test]
    fn test_even_count_uses_positional_median() {
        // sorted: 10 20 30 100, median index 4/2 = 2 -> 30; 100 > 3 * 30
        let result = validate_series(&series(&[10.0, 20.0, 30.0, 100.0]));
        assert!(result.issues.iter().any(|issue| issue.contains("spike")));

        // sorted: 10 20 40 41, median 40; 41 < 120, no spike
        let result = validate_series(&series(&[10.0, 20.0, 40.0, 41.0]));
        assert!(!result.issues.iter().any(|issue| issue.contains("spike")));
    }
}

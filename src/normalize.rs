use crate::domain::PricePoint;

/// A maximum above this means the series arrived in tenths of EUR/MWh.
const TENTHS_CEILING: f64 = 2000.0;
/// A maximum in this open interval means the series arrived in EUR/kWh.
const SUBUNIT_CEILING: f64 = 1.0;
const SUBUNIT_FLOOR: f64 = 0.01;

/// Rescale a series whose magnitude indicates it was published in a finer
/// unit than EUR/MWh. At most one rule fires per series; a series that is
/// already in canonical range comes back unchanged. The thresholds are
/// heuristics: the upstream formats are not self-describing.
pub(crate) fn normalize_units(series: Vec<PricePoint>) -> Vec<PricePoint> {
    let max = series.iter().map(|p| p.price).fold(0.0_f64, f64::max);

    if max > TENTHS_CEILING {
        rescale(series, |price| price / 10.0)
    } else if max < SUBUNIT_CEILING && max > SUBUNIT_FLOOR {
        rescale(series, |price| price * 1000.0)
    } else {
        series
    }
}

fn rescale(series: Vec<PricePoint>, apply: impl Fn(f64) -> f64) -> Vec<PricePoint> {
    series
        .into_iter()
        .map(|point| PricePoint {
            price: apply(point.price),
            ..point
        })
        .collect()
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
    fn test_canonical_series_is_unchanged() {
        let input = series(&[12.5, 45.0, 1999.0]);
        assert_eq!(normalize_units(input.clone()), input);
    }

    #[test]
    fn test_tenths_series_is_divided_by_ten() {
        let output = normalize_units(series(&[5000.0, 420.0]));
        assert_eq!(output[0].price, 500.0);
        assert_eq!(output[1].price, 42.0);
    }

    #[test]
    fn test_subunit_series_is_multiplied_by_thousand() {
        let output = normalize_units(series(&[0.5, 0.042]));
        assert_eq!(output[0].price, 500.0);
        assert_eq!(output[1].price, 42.0);
    }

    #[test]
    fn test_near_zero_series_is_left_alone() {
        // max below the sub-unit floor: cannot tell units apart, do nothing
        let input = series(&[0.001, 0.009]);
        assert_eq!(normalize_units(input.clone()), input);
    }

    #[test]
    fn test_empty_series_does_not_panic() {
        assert!(normalize_units(vec![]).is_empty());
    }
}

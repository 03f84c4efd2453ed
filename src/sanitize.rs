use chrono::{DateTime, Utc};

use crate::domain::{PricePoint, RawRecord};

/// Outcome of sanitizing one raw series. `dropped` counts the records that
/// failed shape checks; duplicates removed after sorting are not drops.
#[derive(Debug, Clone)]
pub(crate) struct Sanitized {
    pub(crate) series: Vec<PricePoint>,
    pub(crate) dropped: usize,
}

/// Turn an untrusted collection of candidate records into a clean series:
/// every point has a parseable timestamp and a finite price, points are
/// sorted ascending by moment and timestamps are unique. The sort is stable,
/// so after deduplication the first occurrence wins, deterministically.
pub(crate) fn sanitize(records: &[RawRecord]) -> Sanitized {
    let mut series: Vec<PricePoint> = records
        .iter()
        .filter_map(|record| {
            let moment = parse_moment(record.ts.as_deref()?)?;
            let price = record.price.filter(|p| p.is_finite())?;
            Some(PricePoint { moment, price })
        })
        .collect();

    let dropped = records.len() - series.len();

    series.sort_by_key(|point| point.moment);
    series.dedup_by_key(|point| point.moment);

    Sanitized { series, dropped }
}

fn parse_moment(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ts: &str, price: f64) -> RawRecord {
        RawRecord {
            ts: Some(ts.to_string()),
            price: Some(price),
        }
    }

    #[test]
    fn test_output_is_sorted_and_unique() {
        let records = vec![
            raw("2024-06-15T03:00:00Z", 30.0),
            raw("2024-06-15T01:00:00Z", 10.0),
            raw("2024-06-15T02:00:00Z", 20.0),
            raw("2024-06-15T01:00:00Z", 99.0),
        ];

        let result = sanitize(&records);

        assert_eq!(result.series.len(), 3);
        assert!(result
            .series
            .windows(2)
            .all(|pair| pair[0].moment < pair[1].moment));
        // first occurrence of the duplicated hour wins
        assert_eq!(result.series[0].price, 10.0);
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_malformed_records_are_dropped_and_counted() {
        let records = vec![
            raw("2024-06-15T00:00:00Z", 42.0),
            raw("not a timestamp", 42.0),
            raw("2024-06-15T01:00:00Z", f64::NAN),
            raw("2024-06-15T02:00:00Z", f64::INFINITY),
            RawRecord {
                ts: None,
                price: Some(42.0),
            },
            RawRecord {
                ts: Some("2024-06-15T03:00:00Z".to_string()),
                price: None,
            },
        ];

        let result = sanitize(&records);

        assert_eq!(result.series.len(), 1);
        assert_eq!(result.dropped, 5);
        assert!(result.series.iter().all(|p| p.price.is_finite()));
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        let result = sanitize(&[]);
        assert!(result.series.is_empty());
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_offset_timestamps_normalize_to_utc() {
        let records = vec![raw("2024-06-15T02:00:00+02:00", 15.0)];

        let result = sanitize(&records);

        assert_eq!(
            result.series[0].moment,
            "2024-06-15T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }
}

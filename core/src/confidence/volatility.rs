//! Volatility estimation from change history (section 4.3.2): group edits
//! by calendar day, take the standard deviation of the per-day counts, and
//! normalize by a configurable divisor `K`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Date, OffsetDateTime};

/// One edit to a logical event, as recorded by the version-control engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub commit_id: String,
    pub change_type: String,
    #[serde(default)]
    pub changed_fields: Vec<String>,
    pub author: String,
}

/// `min(stddev(r) / K, 1)` where `r` is the per-calendar-day edit count
/// vector. `V = 0` when the history has fewer than two entries.
pub fn volatility(history: &[ChangeRecord], k: f64) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }

    let mut per_day: BTreeMap<Date, u64> = BTreeMap::new();
    for record in history {
        *per_day.entry(record.timestamp.date()).or_insert(0) += 1;
    }

    let counts: Vec<f64> = per_day.values().map(|&c| c as f64).collect();
    let mean = counts.iter().sum::<f64>() / counts.len() as f64;
    let variance = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / counts.len() as f64;
    let stddev = variance.sqrt();

    (stddev / k).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record(ts: OffsetDateTime) -> ChangeRecord {
        ChangeRecord {
            timestamp: ts,
            commit_id: "c".into(),
            change_type: "update".into(),
            changed_fields: vec![],
            author: "a".into(),
        }
    }

    #[test]
    fn empty_or_singleton_history_is_zero() {
        assert_eq!(volatility(&[], 10.0), 0.0);
        assert_eq!(volatility(&[record(datetime!(2024-01-01 00:00 UTC))], 10.0), 0.0);
    }

    #[test]
    fn clustered_edits_on_one_day_are_stable() {
        let history = vec![
            record(datetime!(2024-01-01 01:00 UTC)),
            record(datetime!(2024-01-01 02:00 UTC)),
            record(datetime!(2024-01-01 03:00 UTC)),
        ];
        assert_eq!(volatility(&history, 10.0), 0.0);
    }

    #[test]
    fn spread_out_edits_increase_volatility() {
        let history = vec![
            record(datetime!(2024-01-01 00:00 UTC)),
            record(datetime!(2024-01-01 00:05 UTC)),
            record(datetime!(2024-01-02 00:00 UTC)),
            record(datetime!(2024-01-03 00:00 UTC)),
            record(datetime!(2024-01-03 00:05 UTC)),
            record(datetime!(2024-01-03 00:10 UTC)),
        ];
        assert!(volatility(&history, 10.0) > 0.0);
    }

    #[test]
    fn result_is_clamped_to_one() {
        let history: Vec<ChangeRecord> = (0..50i64)
            .map(|i| {
                let day = 1 + (i % 3);
                record(datetime!(2024-01-01 00:00 UTC) + time::Duration::days(day) + time::Duration::minutes(i))
            })
            .collect();
        assert!(volatility(&history, 0.001) <= 1.0);
    }
}

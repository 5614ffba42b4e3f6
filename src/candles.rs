use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single stored price observation. Serialized form is the sorted-set
/// member: `{"price":1.5,"timestamp":1000}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: f64,
    pub timestamp: i64,
}

/// One OHLC candle per occupied time bucket. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candle {
    /// Bucket start (unix seconds), aligned to the interval.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Bucket width in seconds for a timeframe label, `None` if unrecognized.
pub fn interval_seconds(timeframe: &str) -> Option<i64> {
    match timeframe {
        "1m" => Some(60),
        "5m" => Some(300),
        "15m" => Some(900),
        "30m" => Some(1800),
        "1h" => Some(3600),
        "4h" => Some(14400),
        "1D" => Some(86400),
        "3D" => Some(259200),
        _ => None,
    }
}

/// Bucket samples into fixed-width intervals and emit one candle per
/// occupied bucket, ordered by bucket start.
///
/// Close is overwritten by the last sample seen per bucket, so input must
/// already be in time order — the store returns the series score-ordered
/// and this function does not re-sort. Empty buckets produce no candle;
/// gap filling happens later, on the line series.
pub fn aggregate(samples: &[PriceSample], interval: i64) -> Vec<Candle> {
    let mut buckets: BTreeMap<i64, Candle> = BTreeMap::new();

    for sample in samples {
        let time = sample.timestamp.div_euclid(interval) * interval;
        buckets
            .entry(time)
            .and_modify(|candle| {
                candle.high = candle.high.max(sample.price);
                candle.low = candle.low.min(sample.price);
                candle.close = sample.price;
            })
            .or_insert(Candle {
                time,
                open: sample.price,
                high: sample.price,
                low: sample.price,
                close: sample.price,
            });
    }

    buckets.into_values().collect()
}

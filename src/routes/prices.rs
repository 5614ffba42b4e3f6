use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::candles::{aggregate, interval_seconds, PriceSample};
use crate::error::HubError;
use crate::gapfill::{fill_gaps, LinePoint};
use crate::state::AppState;

/// Price endpoints wrap errors in the `{success:false, error}` envelope
/// the chart client expects, unlike the rest of the API.
#[derive(Debug)]
pub struct PriceError(pub HubError);

impl From<HubError> for PriceError {
    fn from(e: HubError) -> Self {
        Self(e)
    }
}

impl IntoResponse for PriceError {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "error": self.0.message() });
        (self.0.status(), Json(body)).into_response()
    }
}

#[derive(Deserialize)]
pub struct TimeframeQuery {
    pub timeframe: Option<String>,
}

/// Body for POST /prices. Fields stay loose on purpose: the poster sends
/// price and timestamp as numbers or numeric strings interchangeably.
#[derive(Deserialize)]
pub struct SetPriceBody {
    pub price: Option<Value>,
    pub timestamp: Option<Value>,
}

// ── Helpers ─────────────────────────────────────────────────────────

fn bucket_width(q: &TimeframeQuery) -> Result<i64, HubError> {
    q.timeframe
        .as_deref()
        .and_then(interval_seconds)
        .ok_or_else(|| HubError::BadRequest("Invalid timeframe".into()))
}

/// Read the whole price series and parse it. Members that fail to parse
/// are dropped; only an entirely unusable series is an error.
async fn load_samples(state: &AppState) -> Result<Vec<PriceSample>, HubError> {
    let entries = state.kv.zrange_withscores(&state.config.prices_key).await?;
    if entries.is_empty() {
        return Err(HubError::NotFound("No price data available".into()));
    }

    let total = entries.len();
    let samples: Vec<PriceSample> = entries
        .into_iter()
        .filter_map(|(member, _score)| match serde_json::from_str(&member) {
            Ok(sample) => Some(sample),
            Err(e) => {
                tracing::warn!("dropping unparsable price entry: {e}");
                None
            }
        })
        .collect();

    if samples.is_empty() {
        return Err(HubError::NotFound("No valid price data available".into()));
    }
    tracing::debug!(total, parsed = samples.len(), "price series loaded");
    Ok(samples)
}

fn value_as_f64(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|f| f.is_finite())
}

fn value_as_i64(v: &Value) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /prices?timeframe= — OHLC candles, one per occupied bucket.
pub async fn get_prices(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TimeframeQuery>,
) -> Result<Json<Value>, PriceError> {
    let width = bucket_width(&q)?;
    let samples = load_samples(&state).await?;
    let candles = aggregate(&samples, width);
    Ok(Json(json!({ "success": true, "data": candles })))
}

/// GET /prices/line?timeframe= — candle closes as a gap-filled line
/// series, flat-forward filled so the chart never shows holes.
pub async fn get_price_line(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TimeframeQuery>,
) -> Result<Json<Value>, PriceError> {
    let width = bucket_width(&q)?;
    let samples = load_samples(&state).await?;
    let points: Vec<LinePoint> = aggregate(&samples, width)
        .into_iter()
        .map(|c| LinePoint {
            time: c.time,
            value: c.close,
        })
        .collect();
    let filled = fill_gaps(points, width);
    Ok(Json(json!({ "success": true, "data": filled })))
}

/// POST /prices — append one `{price, timestamp}` sample to the series.
/// Duplicate timestamps are allowed and kept as distinct members.
pub async fn set_price(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetPriceBody>,
) -> Result<Json<Value>, PriceError> {
    let (Some(raw_price), Some(raw_ts)) = (&body.price, &body.timestamp) else {
        return Err(HubError::BadRequest("Missing price or timestamp values".into()).into());
    };
    let price = value_as_f64(raw_price)
        .ok_or_else(|| HubError::BadRequest("Invalid price value".into()))?;
    let timestamp = value_as_i64(raw_ts)
        .ok_or_else(|| HubError::BadRequest("Invalid timestamp value".into()))?;

    let member = serde_json::to_string(&PriceSample { price, timestamp }).map_err(HubError::from)?;
    state
        .kv
        .zadd(&state.config.prices_key, timestamp, &member)
        .await?;

    tracing::info!(price, timestamp, "price sample stored");
    Ok(Json(
        json!({ "success": true, "timestamp": timestamp, "price": price }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HubConfig;

    fn test_state() -> Arc<AppState> {
        AppState::new(HubConfig::default()).unwrap()
    }

    fn tf(label: &str) -> Query<TimeframeQuery> {
        Query(TimeframeQuery {
            timeframe: Some(label.to_string()),
        })
    }

    fn body(v: Value) -> Json<SetPriceBody> {
        Json(serde_json::from_value(v).unwrap())
    }

    #[tokio::test]
    async fn append_then_aggregate_roundtrip() {
        let state = test_state();
        set_price(State(state.clone()), body(json!({"price": 1.5, "timestamp": 1000})))
            .await
            .unwrap();

        let Json(res) = get_prices(State(state), tf("1m")).await.unwrap();
        assert_eq!(res["success"], json!(true));
        assert_eq!(
            res["data"],
            json!([{ "time": 960, "open": 1.5, "high": 1.5, "low": 1.5, "close": 1.5 }])
        );
    }

    #[tokio::test]
    async fn unknown_timeframe_is_bad_request_on_both_gets() {
        let state = test_state();
        let err = get_prices(State(state.clone()), tf("2m")).await.unwrap_err();
        assert!(matches!(err.0, HubError::BadRequest(_)));
        let err = get_price_line(State(state), tf("2m")).await.unwrap_err();
        assert!(matches!(err.0, HubError::BadRequest(_)));
    }

    #[tokio::test]
    async fn empty_series_is_not_found() {
        let err = get_prices(State(test_state()), tf("1h")).await.unwrap_err();
        assert!(matches!(err.0, HubError::NotFound(_)));
        assert_eq!(err.0.message(), "No price data available");
    }

    #[tokio::test]
    async fn unparsable_members_are_dropped_silently() {
        let state = test_state();
        state.kv.zadd("rose_prices", 50, "not json").await.unwrap();
        set_price(State(state.clone()), body(json!({"price": 2.0, "timestamp": 100})))
            .await
            .unwrap();

        let Json(res) = get_prices(State(state), tf("1m")).await.unwrap();
        assert_eq!(res["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn all_unparsable_members_is_not_found() {
        let state = test_state();
        state.kv.zadd("rose_prices", 50, "garbage").await.unwrap();
        let err = get_prices(State(state), tf("1m")).await.unwrap_err();
        assert!(matches!(err.0, HubError::NotFound(_)));
        assert_eq!(err.0.message(), "No valid price data available");
    }

    #[tokio::test]
    async fn missing_fields_rejected() {
        let err = set_price(State(test_state()), body(json!({"price": 1.0})))
            .await
            .unwrap_err();
        assert!(matches!(err.0, HubError::BadRequest(_)));
        assert_eq!(err.0.message(), "Missing price or timestamp values");
    }

    #[tokio::test]
    async fn non_numeric_price_rejected() {
        let err = set_price(
            State(test_state()),
            body(json!({"price": "so much", "timestamp": 1000})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0.message(), "Invalid price value");
    }

    #[tokio::test]
    async fn stringly_typed_numbers_accepted() {
        let state = test_state();
        let Json(res) = set_price(
            State(state),
            body(json!({"price": "1.25", "timestamp": "600"})),
        )
        .await
        .unwrap();
        assert_eq!(res["price"], json!(1.25));
        assert_eq!(res["timestamp"], json!(600));
    }

    #[tokio::test]
    async fn line_series_is_gap_filled() {
        let state = test_state();
        for (price, ts) in [(10.0, 0), (20.0, 180)] {
            set_price(
                State(state.clone()),
                body(json!({"price": price, "timestamp": ts})),
            )
            .await
            .unwrap();
        }

        let Json(res) = get_price_line(State(state), tf("1m")).await.unwrap();
        assert_eq!(
            res["data"],
            json!([
                { "time": 0, "value": 10.0 },
                { "time": 60, "value": 10.0 },
                { "time": 120, "value": 10.0 },
                { "time": 180, "value": 20.0 }
            ])
        );
    }
}

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::HubError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EligibleQuery {
    pub address: Option<String>,
}

/// GET /eligible?address=0x… — communities an address may claw back from.
///
/// Only the `0x` prefix is validated; checksum and length are not. The
/// stored value is a comma-separated list written by the snapshot job; an
/// address with no record simply has no communities.
pub async fn get_address_communities(
    State(state): State<Arc<AppState>>,
    Query(q): Query<EligibleQuery>,
) -> Result<Json<Value>, HubError> {
    let address = q
        .address
        .filter(|a| a.starts_with("0x"))
        .ok_or_else(|| HubError::BadRequest("Invalid address provided".into()))?;

    let stored = state.kv.get(&address).await.map_err(|e| {
        HubError::Internal(format!("Failed to fetch address communities: {}", e.message()))
    })?;

    // Naive split: an empty stored value yields one empty-string
    // community. The snapshot writer guarantees non-empty values.
    let communities: Vec<String> = match stored {
        Some(s) => s.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };

    tracing::debug!(%address, count = communities.len(), "eligibility lookup");
    Ok(Json(json!({ "address": address, "communities": communities })))
}

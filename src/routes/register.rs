use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::HubError;
use crate::registry::RegistrationTable;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterBody {
    pub address: Option<String>,
    pub community: Option<String>,
}

/// POST /register — add an address to a community's clawback list.
///
/// The whole table lives under one KV key and is persisted with a single
/// write. There is no compare-and-swap on the store, so two racing
/// registrations can overwrite each other; acceptable at this volume.
pub async fn register_address(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<Value>, HubError> {
    let (Some(address), Some(community)) = (
        body.address.filter(|s| !s.is_empty()),
        body.community.filter(|s| !s.is_empty()),
    ) else {
        return Err(HubError::BadRequest(
            "Address and community are required".into(),
        ));
    };

    let mut table = match state.kv.get(&state.config.registry_key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| HubError::Kv(format!("corrupt registration table: {e}")))?,
        None => RegistrationTable::seeded(),
    };

    if !table.register(&address, &community) {
        tracing::info!(%address, "registration refused, already registered");
        return Err(HubError::Conflict(
            "Address already registered in a community".into(),
        ));
    }

    let raw = serde_json::to_string(&table)?;
    state.kv.set(&state.config.registry_key, &raw).await?;

    tracing::info!(%address, %community, "address registered");
    Ok(Json(json!({ "message": "Address registered successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HubConfig;

    fn test_state() -> Arc<AppState> {
        AppState::new(HubConfig::default()).unwrap()
    }

    fn body(address: Option<&str>, community: Option<&str>) -> Json<RegisterBody> {
        Json(RegisterBody {
            address: address.map(str::to_string),
            community: community.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn first_registration_succeeds_second_conflicts() {
        let state = test_state();
        let Json(res) = register_address(State(state.clone()), body(Some("0xABC"), Some("aeon")))
            .await
            .unwrap();
        assert_eq!(res["message"], json!("Address registered successfully"));

        let err = register_address(State(state), body(Some("0xABC"), Some("aeon")))
            .await
            .unwrap_err();
        assert!(matches!(err, HubError::Conflict(_)));
    }

    #[tokio::test]
    async fn conflict_applies_across_communities() {
        let state = test_state();
        register_address(State(state.clone()), body(Some("0xABC"), Some("aeon")))
            .await
            .unwrap();
        let err = register_address(State(state), body(Some("0xABC"), Some("milady")))
            .await
            .unwrap_err();
        assert!(matches!(err, HubError::Conflict(_)));
    }

    #[tokio::test]
    async fn table_is_seeded_and_persisted_on_first_write() {
        let state = test_state();
        register_address(State(state.clone()), body(Some("0x1"), Some("spx")))
            .await
            .unwrap();

        let raw = state.kv.get("registered-addresses").await.unwrap().unwrap();
        let table: RegistrationTable = serde_json::from_str(&raw).unwrap();
        assert_eq!(table.0.len(), 6);
        assert_eq!(table.0["spx"], vec!["0x1".to_string()]);
    }

    #[tokio::test]
    async fn unseeded_community_accepted() {
        let state = test_state();
        register_address(State(state.clone()), body(Some("0x2"), Some("remilio")))
            .await
            .unwrap();
        let raw = state.kv.get("registered-addresses").await.unwrap().unwrap();
        let table: RegistrationTable = serde_json::from_str(&raw).unwrap();
        assert_eq!(table.0["remilio"], vec!["0x2".to_string()]);
    }

    #[tokio::test]
    async fn missing_fields_rejected() {
        for (a, c) in [(None, Some("aeon")), (Some("0x1"), None), (Some(""), Some("aeon"))] {
            let err = register_address(State(test_state()), body(a, c))
                .await
                .unwrap_err();
            assert!(matches!(err, HubError::BadRequest(_)));
        }
    }
}

pub mod eligible;
pub mod prices;
pub mod register;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Assemble the API router. Method routers give unmatched verbs a 405
/// with the `Allow` header for free.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/prices",
            get(prices::get_prices).post(prices::set_price),
        )
        .route("/prices/line", get(prices::get_price_line))
        .route("/eligible", get(eligible::get_address_communities))
        .route("/register", post(register::register_address))
}

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// Tag every request with a fresh `x-request-id` and run the handler
/// inside an `http` span carrying method, uri and the id.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let rid = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&rid).expect("uuid is a valid header value");
    req.headers_mut().insert("x-request-id", header.clone());

    let span = info_span!("http", method = %req.method(), uri = %req.uri(), request_id = %rid);
    let mut res = next.run(req).instrument(span).await;

    res.headers_mut().insert("x-request-id", header);
    res
}

use axum::Json;
use mannam_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("mannam-api", env!("CARGO_PKG_VERSION")))
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use service::AppState;

/// GET report whether the server is serving streams or draining them
pub async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    if app_state.sse_manager.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "healthy")
    }
}

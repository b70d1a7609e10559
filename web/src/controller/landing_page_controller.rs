use axum::extract::State;
use axum::response::{Html, IntoResponse};
use service::AppState;

/// GET the landing page that subscribes to the event stream
pub async fn index(State(app_state): State<AppState>) -> impl IntoResponse {
    Html(app_state.landing_page())
}

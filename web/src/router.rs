use crate::controller::{health_check_controller, landing_page_controller};
use crate::page::STREAM_PATH;
use crate::sse::handler::stream_handler;
use axum::{routing::get, Router};
use service::AppState;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(landing_page_routes(app_state.clone()))
        .merge(stream_routes(app_state.clone()))
        .merge(health_routes(app_state))
}

fn landing_page_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page_controller::index))
        .with_state(app_state)
}

fn stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route(STREAM_PATH, get(stream_handler))
        .with_state(app_state)
}

fn health_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use clap::Parser;
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_state() -> AppState {
        let config = Config::parse_from(["hexfeed"]);
        let manager = Arc::new(sse::Manager::default());
        let page = crate::page::render(&config);
        AppState::new(config, &manager, page)
    }

    #[tokio::test]
    async fn test_index_serves_landing_page() {
        let app = define_routes(app_state());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("/stream"));
    }

    #[tokio::test]
    async fn test_stream_responds_with_event_stream() {
        let app = define_routes(app_state());

        let request = Request::builder()
            .uri("/stream")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    }

    #[tokio::test]
    async fn test_stream_refused_while_draining() {
        let state = app_state();
        state
            .sse_manager
            .drain(std::time::Duration::from_secs(1))
            .await
            .unwrap();
        let app = define_routes(state);

        let request = Request::builder()
            .uri("/stream")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_reports_draining() {
        let state = app_state();
        let app = define_routes(state.clone());

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        state
            .sse_manager
            .drain(std::time::Duration::from_secs(1))
            .await
            .unwrap();

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_stream_rejects_post() {
        let app = define_routes(app_state());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/stream")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let app = define_routes(app_state());

        let request = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! Health check HTTP route handlers
//!
//! Provides a single liveness endpoint:
//! - `GET /health` - returns 200 with a JSON body while the process serves requests

use axum::{response::IntoResponse, routing::get, Json, Router};

/// Create health check router
pub fn health_router() -> Router {
    Router::new().route("/", get(liveness))
}

/// Simple liveness check
///
/// This is useful for load balancer health checks that just need to verify
/// the server is responding to HTTP requests; it deliberately checks no
/// external dependencies.
async fn liveness() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_liveness() {
        let response = liveness().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

//! HTTP route handlers for the Quill API
//!
//! This module contains the HTTP surface:
//! - GraphQL execution and playground endpoints
//! - Health check endpoint

pub mod graphql;
pub mod health;

pub use graphql::{graphql_handler, graphql_playground, AppState};
pub use health::health_router;

use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::graphql::QuillSchema;

/// Assemble the application router
pub fn build_router(schema: QuillSchema, state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root))
        // GraphQL endpoints
        .route("/graphql", post(graphql_handler))
        .route("/graphql/playground", get(graphql_playground))
        // Health route: /health
        .nest("/health", health_router())
        // Add services as extensions for the handlers
        .layer(Extension(schema))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn root() -> &'static str {
    "Welcome to Quill - a GraphQL blogging API"
}

//! GraphQL HTTP route handlers
//!
//! One POST endpoint executes queries. Per request the handler captures the
//! raw `Authorization` header and assembles a fresh [`RequestContext`] with
//! brand-new loaders, so no cache or identity ever crosses request
//! boundaries.

use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::Extension;
use axum::http::{header, HeaderMap};
use sqlx::PgPool;

use crate::graphql::loaders::LoaderConfig;
use crate::graphql::{QuillSchema, RequestContext};
use crate::services::AuthService;

/// Shared application state for the GraphQL handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthService,
    pub loader_config: LoaderConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(pool: PgPool, auth: AuthService, loader_config: LoaderConfig) -> Self {
        Self {
            pool,
            auth,
            loader_config,
        }
    }
}

/// GraphQL handler that executes queries against the schema
///
/// The `Authorization` header rides along unverified; the authentication
/// guard inspects it only when a protected field is resolved, so public
/// queries on an unauthenticated request never touch credential handling.
pub async fn graphql_handler(
    Extension(schema): Extension<QuillSchema>,
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let context = RequestContext::new(
        state.pool.clone(),
        state.auth.clone(),
        authorization,
        &state.loader_config,
    );

    let request = req.into_inner().data(Arc::new(context));
    schema.execute(request).await.into()
}

/// GraphQL Playground handler for development
pub async fn graphql_playground() -> impl axum::response::IntoResponse {
    axum::response::Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}

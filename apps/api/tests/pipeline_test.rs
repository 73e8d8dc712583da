//! Integration tests for composed resolver pipelines
//!
//! Builds guarded pipelines out of the crate's public pieces and drives
//! them directly, without HTTP in the way. The storage pool points at a
//! dead address, so any stage that reached for the database would fail
//! loudly instead of passing unnoticed.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use futures_util::FutureExt;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use quill_api::graphql::compose::{compose, resolver, ComposableResolver, ResolverDecorator};
use quill_api::graphql::context::{RequestContext, ResolverRequest};
use quill_api::graphql::guards::auth_guard;
use quill_api::graphql::loaders::LoaderConfig;
use quill_api::graphql::projection::FieldSet;
use quill_api::{ApiError, AuthConfig, AuthFailure, AuthService};

use common::*;

/// Build a request carrying the given bearer token, over the dead pool
fn request_with_token(token: Option<&str>) -> ResolverRequest<()> {
    let context = RequestContext::new(
        unreachable_pool(),
        test_auth_service(),
        token.map(|t| format!("Bearer {t}")),
        &LoaderConfig::default(),
    );
    ResolverRequest::new(Arc::new(context), FieldSet::new(), ())
}

/// Terminal that counts its invocations and returns the caller's id
fn counting_terminal(calls: Arc<AtomicUsize>) -> ComposableResolver<(), Uuid> {
    resolver(move |request: ResolverRequest<()>| {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            let caller = *request.ctx.require_auth_user()?;
            Ok(caller.id)
        }
    })
}

#[tokio::test]
async fn test_valid_token_reaches_the_terminal_with_identity() {
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = compose(vec![auth_guard()])(counting_terminal(Arc::clone(&calls)));

    let user_id = Uuid::new_v4();
    let token = test_auth_service().generate_token(user_id).unwrap();

    let resolved = assert_ok!(chain.resolve(request_with_token(Some(&token))).await);

    assert_eq!(resolved, user_id);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_credential_never_runs_the_terminal() {
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = compose(vec![auth_guard()])(counting_terminal(Arc::clone(&calls)));

    let err = assert_err!(chain.resolve(request_with_token(None)).await);

    assert_matches!(
        err,
        ApiError::Authentication(AuthFailure::MissingCredential)
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_expired_token_never_runs_the_terminal() {
    let mut config = AuthConfig::new(TEST_JWT_SECRET.to_string());
    config.token_ttl_secs = -7200;
    let expired = AuthService::new(config)
        .generate_token(Uuid::new_v4())
        .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let chain = compose(vec![auth_guard()])(counting_terminal(Arc::clone(&calls)));

    let err = assert_err!(chain.resolve(request_with_token(Some(&expired))).await);

    assert_matches!(err, ApiError::Authentication(AuthFailure::ExpiredToken));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_guard_rejects_before_inner_decorators_run() {
    let inner_ran = Arc::new(AtomicUsize::new(0));
    let marking: ResolverDecorator<(), Uuid> = {
        let inner_ran = Arc::clone(&inner_ran);
        Box::new(move |inner| {
            ComposableResolver::new(move |request| {
                let inner = inner.clone();
                let inner_ran = Arc::clone(&inner_ran);
                async move {
                    inner_ran.fetch_add(1, Ordering::SeqCst);
                    inner.resolve(request).await
                }
                .boxed()
            })
        })
    };

    let calls = Arc::new(AtomicUsize::new(0));
    // First decorator in the list is outermost, so the guard sees the
    // request before the marking stage can touch it
    let chain =
        compose(vec![auth_guard(), marking])(counting_terminal(Arc::clone(&calls)));

    assert_err!(chain.resolve(request_with_token(None)).await);

    assert_eq!(inner_ran.load(Ordering::SeqCst), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_pipeline_is_reusable_across_callers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = compose(vec![auth_guard()])(counting_terminal(Arc::clone(&calls)));
    let service = test_auth_service();

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let alice_token = service.generate_token(alice).unwrap();
    let bob_token = service.generate_token(bob).unwrap();

    // Each request builds a fresh context, so identities never bleed over
    let first = assert_ok!(chain.resolve(request_with_token(Some(&alice_token))).await);
    let second = assert_ok!(chain.resolve(request_with_token(Some(&bob_token))).await);

    assert_eq!(first, alice);
    assert_eq!(second, bob);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

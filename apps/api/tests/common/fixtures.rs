//! Test fixtures for API integration tests
//!
//! GraphQL-driven builders: accounts, posts, and comments are created
//! through the real mutations, so every fixture travels the same path
//! production traffic takes.

#![allow(dead_code)]

use axum::Router;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use super::helpers::{graphql_request_with_vars, parse_body_value};

/// Generate a unique email to avoid cross-test collisions
pub fn unique_email() -> String {
    format!("test_{}@example.com", Uuid::new_v4())
}

/// Generate a display name
pub fn person_name() -> String {
    Name().fake()
}

/// Generate a post title
pub fn post_title() -> String {
    Sentence(3..8).fake()
}

/// Generate post body text
pub fn post_body() -> String {
    Paragraph(1..3).fake()
}

/// Generate a comment body
pub fn comment_body() -> String {
    Sentence(5..12).fake()
}

/// An account registered through the API, holding a live token
#[derive(Debug, Clone)]
pub struct TestAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Register a fresh account and log it in.
///
/// Panics on failure; fixtures run before whatever a test actually asserts.
pub async fn signup(app: &Router) -> TestAccount {
    let name = person_name();
    let email = unique_email();
    let password = format!("pw-{}", Uuid::new_v4());

    let response = app
        .clone()
        .oneshot(graphql_request_with_vars(
            "mutation($input: CreateUserInput!) { createUser(input: $input) { id } }",
            json!({ "input": { "name": name, "email": email, "password": password } }),
            None,
        ))
        .await
        .unwrap();
    let body = parse_body_value(response).await;
    let id = body["data"]["createUser"]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("createUser failed: {body}"));
    let id = Uuid::parse_str(id).unwrap();

    let token = login(app, &email, &password).await;

    TestAccount {
        id,
        name,
        email,
        password,
        token,
    }
}

/// Obtain a token for existing credentials
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(graphql_request_with_vars(
            "mutation($email: String!, $password: String!) { \
                 createToken(email: $email, password: $password) { token } \
             }",
            json!({ "email": email, "password": password }),
            None,
        ))
        .await
        .unwrap();
    let body = parse_body_value(response).await;
    body["data"]["createToken"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("createToken failed: {body}"))
        .to_string()
}

/// Publish a post as the token's account, returning the post id
pub async fn publish_post(app: &Router, token: &str, title: &str, content: &str) -> Uuid {
    let response = app
        .clone()
        .oneshot(graphql_request_with_vars(
            "mutation($input: CreatePostInput!) { createPost(input: $input) { id } }",
            json!({ "input": { "title": title, "content": content } }),
            Some(token),
        ))
        .await
        .unwrap();
    let body = parse_body_value(response).await;
    let id = body["data"]["createPost"]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("createPost failed: {body}"));
    Uuid::parse_str(id).unwrap()
}

/// Comment on a post as the token's account, returning the comment id
pub async fn publish_comment(app: &Router, token: &str, post_id: Uuid, content: &str) -> Uuid {
    let response = app
        .clone()
        .oneshot(graphql_request_with_vars(
            "mutation($input: CreateCommentInput!) { createComment(input: $input) { id } }",
            json!({ "input": { "content": content, "postId": post_id.to_string() } }),
            Some(token),
        ))
        .await
        .unwrap();
    let body = parse_body_value(response).await;
    let id = body["data"]["createComment"]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("createComment failed: {body}"));
    Uuid::parse_str(id).unwrap()
}

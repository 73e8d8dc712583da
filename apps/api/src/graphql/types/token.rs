//! Token GraphQL type

use async_graphql::SimpleObject;

/// Signed credential returned by the token mutation
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    /// Bearer JWT for subsequent requests
    pub token: String,
}

impl Token {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

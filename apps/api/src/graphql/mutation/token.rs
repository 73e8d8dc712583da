//! Token mutations
//!
//! - createToken: exchange email and password for a signed bearer token

use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::error::ApiError;
use crate::graphql::context::RequestContext;
use crate::graphql::types::Token;

/// Token mutations
#[derive(Default)]
pub struct TokenMutation;

#[Object]
impl TokenMutation {
    /// Exchange login credentials for a bearer token
    ///
    /// # Errors
    /// Unknown emails and wrong passwords produce the same authentication
    /// error, so callers cannot probe which emails are registered.
    async fn create_token(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> Result<Token> {
        let context = ctx.data::<Arc<RequestContext>>()?;

        let credentials = context
            .users
            .find_credentials_by_email(&email)
            .await
            .map_err(ApiError::from)?;

        let user_id = context
            .auth_service()
            .check_credentials(credentials.as_ref(), &password)?;
        let token = context.auth_service().generate_token(user_id)?;

        tracing::info!(user_id = %user_id, "token issued");
        Ok(Token::new(token))
    }
}

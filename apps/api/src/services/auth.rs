//! Authentication service
//!
//! This module provides the credential side of authentication:
//! - Argon2id password hashing and verification
//! - JWT issuance and verification
//! - Login checks hardened against timing-based user enumeration
//!
//! The service holds no storage handle. Looking up who owns an email is the
//! token mutation's job; everything here works on values it is handed, which
//! is what lets credential rejection happen without touching the database.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult, AuthFailure};
use crate::models::user::{Claims, UserCredentials};

/// Authentication service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token TTL in seconds (default: 7 days)
    pub token_ttl_secs: i64,
    /// JWT issuer
    pub issuer: String,
    /// JWT audience
    pub audience: String,
}

impl AuthConfig {
    /// Create a new AuthConfig with the default TTL
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            token_ttl_secs: 7 * 24 * 3600, // 7 days
            issuer: "quill".to_string(),
            audience: "quill".to_string(),
        }
    }

    /// Create AuthConfig from an expiry string (e.g., "15m", "7d")
    pub fn with_expiry_string(jwt_secret: String, expiry: &str) -> Self {
        Self {
            jwt_secret,
            token_ttl_secs: parse_duration_string(expiry).unwrap_or(7 * 24 * 3600),
            issuer: "quill".to_string(),
            audience: "quill".to_string(),
        }
    }
}

/// Parse duration strings like "15m", "7d", "24h" to seconds
fn parse_duration_string(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, unit) = s.split_at(s.len() - 1);
    let num: i64 = num_str.parse().ok()?;

    match unit {
        "s" => Some(num),
        "m" => Some(num * 60),
        "h" => Some(num * 3600),
        "d" => Some(num * 24 * 3600),
        "w" => Some(num * 7 * 24 * 3600),
        _ => None,
    }
}

/// Authentication service providing credential checks and token management
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    argon2: Argon2<'static>,
    /// Pre-computed dummy hash for timing attack prevention.
    /// We verify against this hash when a user is not found to ensure
    /// consistent response times regardless of whether the email exists.
    dummy_password_hash: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: AuthConfig) -> Self {
        let argon2 = Argon2::default();

        // Pre-compute a dummy password hash for timing attack prevention.
        // This hash is used when a user lookup fails, ensuring that the
        // password verification step takes the same amount of time whether
        // or not the user exists, preventing user enumeration attacks.
        let dummy_salt = SaltString::generate(&mut OsRng);
        let dummy_password_hash = argon2
            .hash_password(b"dummy_password_for_timing_attack_prevention", &dummy_salt)
            .expect("dummy password hashing should not fail")
            .to_string();

        Self {
            config,
            argon2,
            dummy_password_hash,
        }
    }

    /// Check a login attempt against the credentials found for its email
    ///
    /// # Arguments
    /// * `credentials` - The stored credentials, or `None` if the email is unknown
    /// * `password` - The plaintext password from the login attempt
    ///
    /// # Returns
    /// The user's ID when the password matches
    ///
    /// # Errors
    /// - `AuthFailure::BadCredentials` for unknown emails and wrong passwords
    ///   alike; the error never says which one it was
    pub fn check_credentials(
        &self,
        credentials: Option<&UserCredentials>,
        password: &str,
    ) -> ApiResult<Uuid> {
        let Some(credentials) = credentials else {
            // Burn the same time a real verification would
            let _ = self.verify_password(password, &self.dummy_password_hash);
            tracing::warn!("login attempt for unknown email");
            return Err(AuthFailure::BadCredentials.into());
        };

        if !self.verify_password(password, &credentials.password_hash)? {
            tracing::warn!(user_id = %credentials.id, "login attempt with wrong password");
            return Err(AuthFailure::BadCredentials.into());
        }

        Ok(credentials.id)
    }

    /// Issue a signed token for a user
    pub fn generate_token(&self, user_id: Uuid) -> ApiResult<String> {
        let claims = Claims::new(user_id, self.config.token_ttl_secs);

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("token encoding failed: {}", e)))
    }

    /// Verify a token and return its claims
    ///
    /// # Arguments
    /// * `token` - The JWT to verify
    ///
    /// # Returns
    /// The decoded Claims on success
    ///
    /// # Errors
    /// An [`AuthFailure`] naming why the token was rejected; the underlying
    /// jsonwebtoken error is logged but never forwarded
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthFailure> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "token verification failed");
            AuthFailure::from(e)
        })?;

        Ok(token_data.claims)
    }

    /// Hash a password with Argon2id
    pub fn hash_password(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against an Argon2id hash
    fn verify_password(&self, password: &str, hash: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| ApiError::Internal(format!("invalid password hash format: {}", e)))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Simple email validation
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > 254 {
        return false;
    }

    // Must have exactly one @ symbol
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = (parts[0], parts[1]);

    // Local part must not be empty and not too long
    if local.is_empty() || local.len() > 64 {
        return false;
    }

    // Domain must have at least one dot and not be empty
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    // Domain parts must not be empty
    domain.split('.').all(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const TEST_SECRET: &str = "test-jwt-secret-at-least-32-chars!!";

    fn service() -> AuthService {
        AuthService::new(AuthConfig::new(TEST_SECRET.to_string()))
    }

    #[test]
    fn test_parse_duration_string() {
        assert_eq!(parse_duration_string("15m"), Some(900));
        assert_eq!(parse_duration_string("7d"), Some(604800));
        assert_eq!(parse_duration_string("24h"), Some(86400));
        assert_eq!(parse_duration_string("30s"), Some(30));
        assert_eq!(parse_duration_string("1w"), Some(604800));
        assert_eq!(parse_duration_string(""), None);
        assert_eq!(parse_duration_string("invalid"), None);
        assert_eq!(parse_duration_string("15x"), None);
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@bad..domain"));
    }

    #[test]
    fn test_token_roundtrip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.generate_token(user_id).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "quill");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_token_is_rejected_as_expired() {
        let mut config = AuthConfig::new(TEST_SECRET.to_string());
        // Issue tokens that expired two hours ago, past any leeway
        config.token_ttl_secs = -7200;
        let service = AuthService::new(config);

        let token = service.generate_token(Uuid::new_v4()).unwrap();
        let failure = service.verify_token(&token).unwrap_err();

        assert_eq!(failure, AuthFailure::ExpiredToken);
    }

    #[test]
    fn test_wrong_secret_is_rejected_as_invalid_signature() {
        let token = service().generate_token(Uuid::new_v4()).unwrap();

        let other = AuthService::new(AuthConfig::new("another-secret-also-32-chars-long!!".into()));
        let failure = other.verify_token(&token).unwrap_err();

        assert_eq!(failure, AuthFailure::InvalidSignature);
    }

    #[test]
    fn test_garbage_token_is_rejected_as_malformed() {
        let failure = service().verify_token("not.a.jwt").unwrap_err();
        assert_eq!(failure, AuthFailure::MalformedToken);
    }

    #[test]
    fn test_check_credentials_accepts_matching_password() {
        let service = service();
        let id = Uuid::new_v4();
        let credentials = UserCredentials {
            id,
            password_hash: service.hash_password("hunter22").unwrap(),
        };

        let verified = service.check_credentials(Some(&credentials), "hunter22");
        assert_eq!(verified.unwrap(), id);
    }

    #[test]
    fn test_check_credentials_rejects_wrong_password() {
        let service = service();
        let credentials = UserCredentials {
            id: Uuid::new_v4(),
            password_hash: service.hash_password("hunter22").unwrap(),
        };

        let err = service
            .check_credentials(Some(&credentials), "hunter23")
            .unwrap_err();
        assert_matches!(
            err,
            ApiError::Authentication(AuthFailure::BadCredentials)
        );
    }

    #[test]
    fn test_check_credentials_hides_unknown_email() {
        let err = service().check_credentials(None, "hunter22").unwrap_err();
        // Same failure kind and message as a wrong password
        assert_matches!(
            err,
            ApiError::Authentication(AuthFailure::BadCredentials)
        );
        assert_eq!(err.to_string(), "wrong email or password");
    }

    #[test]
    fn test_hash_password_salts() {
        let service = service();
        let a = service.hash_password("hunter22").unwrap();
        let b = service.hash_password("hunter22").unwrap();
        assert_ne!(a, b);
        assert!(service.verify_password("hunter22", &a).unwrap());
        assert!(service.verify_password("hunter22", &b).unwrap());
    }
}

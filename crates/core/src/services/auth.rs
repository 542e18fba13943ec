//! Authentication service.
//!
//! Access tokens are HS256 JWTs whose `userId` claim identifies the caller.

use follows_common::{AppError, AppResult, config::AuthConfig};
use follows_db::{entities::user, repositories::UserRepository};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user.
    #[serde(rename = "userId")]
    pub user_id: i32,
    /// Expiry as a unix timestamp.
    pub exp: u64,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: u64,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(user_repo: UserRepository, config: &AuthConfig) -> Self {
        Self {
            user_repo,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_secs: config.token_ttl_secs,
        }
    }

    /// Issue an access token for a user.
    pub fn issue_token(&self, user_id: i32) -> AppResult<String> {
        let claims = Claims {
            user_id,
            exp: jsonwebtoken::get_current_timestamp() + self.token_ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Verify a token and return the claims it carries.
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                AppError::Unauthorized
            })
    }

    /// Resolve the user behind an access token.
    ///
    /// Tokens for users that no longer exist are rejected.
    pub async fn authenticate(&self, token: &str) -> AppResult<user::Model> {
        let claims = self.verify_token(token)?;

        self.user_repo
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

//! Signed bearer tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult, TokenConfig};
use domain::TOKEN_TYPE_BEARER;

/// Which secret a token is signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Token claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier
    pub sub: Uuid,
    pub kind: TokenKind,
    /// Issued at (unix seconds)
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Token pair returned after successful authentication
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always "Bearer"
    pub token_type: String,
}

/// Signs and verifies account tokens.
pub trait TokenIssuer: Send + Sync {
    /// Sign a token carrying the account ID
    fn sign(&self, account_id: Uuid, kind: TokenKind) -> AppResult<String>;

    /// Verify a token with the secret for `kind` and return its claims
    fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims>;

    /// Sign both an access and a refresh token for the account
    fn issue_pair(&self, account_id: Uuid) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.sign(account_id, TokenKind::Access)?,
            refresh_token: self.sign(account_id, TokenKind::Refresh)?,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        })
    }
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Option<Duration>,
}

impl SigningKeys {
    fn new(secret: &str, ttl_minutes: Option<i64>) -> AppResult<Self> {
        let ttl = ttl_minutes
            .map(|minutes| {
                Duration::try_minutes(minutes).ok_or_else(|| {
                    AppError::config(format!("Token TTL of {} minutes is out of range", minutes))
                })
            })
            .transpose()?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }
}

/// HS256 JWT implementation of TokenIssuer.
///
/// Secrets are fixed at construction; nothing here reads the environment.
pub struct JwtIssuer {
    access: SigningKeys,
    refresh: SigningKeys,
    validation: Validation,
}

impl JwtIssuer {
    /// Build an issuer from token configuration.
    ///
    /// # Errors
    /// Returns a config error when the secrets are too short or identical,
    /// or a TTL is out of range.
    pub fn new(config: &TokenConfig) -> AppResult<Self> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is enforced when present but only issued when a TTL is set
        validation.required_spec_claims.clear();

        Ok(Self {
            access: SigningKeys::new(&config.access_secret, config.access_ttl_minutes)?,
            refresh: SigningKeys::new(&config.refresh_secret, config.refresh_ttl_minutes)?,
            validation,
        })
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

impl TokenIssuer for JwtIssuer {
    fn sign(&self, account_id: Uuid, kind: TokenKind) -> AppResult<String> {
        let keys = self.keys(kind);
        let now = Utc::now();
        let exp = match keys.ttl {
            Some(ttl) => Some(
                now.checked_add_signed(ttl)
                    .ok_or_else(|| {
                        AppError::internal(format!("{} token expiry overflows the calendar", kind))
                    })?
                    .timestamp(),
            ),
            None => None,
        };
        let claims = Claims {
            sub: account_id,
            kind,
            iat: now.timestamp(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AppError::internal(format!("Failed to sign {} token: {}", kind, e)))
    }

    fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected {} token: {}", kind, e);
                AppError::InvalidToken
            })?;

        if claims.kind != kind {
            tracing::debug!("Expected {} token, got {}", kind, claims.kind);
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }
}

//! Stateless session tokens.
//!
//! Tokens are HS256 JWTs carrying the user's id and display name. Nothing is stored
//! server-side, so a token stays valid until it expires.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Token has expired")]
    Expired,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub id: String,
    pub name: String,
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    /// Display name at issue time
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    #[must_use]
    pub fn subject(&self) -> TokenSubject {
        TokenSubject {
            id: self.sub.clone(),
            name: self.name.clone(),
        }
    }
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: TimeDelta,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, lifetime: TimeDelta) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        }
    }

    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        let lifetime = TimeDelta::from_std(config.lifetime()?)
            .map_err(|e| anyhow::anyhow!("Token lifetime out of range: {e}"))?;
        Ok(Self::new(&config.jwt_secret, lifetime))
    }

    #[must_use]
    pub const fn lifetime(&self) -> TimeDelta {
        self.lifetime
    }

    /// Issues a token expiring one lifetime from now.
    pub fn issue(&self, subject: &TokenSubject) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issues a token as if it had been minted at `issued_at`.
    pub fn issue_at(
        &self,
        subject: &TokenSubject,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = issued_at + self.lifetime;
        let claims = TokenClaims {
            sub: subject.id.clone(),
            name: subject.name.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

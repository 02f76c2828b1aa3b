//! HS256 token codec.
//!
//! Signing and verification are delegated to `jsonwebtoken`; this module only
//! decides what goes into the claims and which kind of token is acceptable
//! where.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{Claims, TokenKind};
use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is invalid or expired")]
    Invalid,

    #[error("token has wrong type for this operation")]
    WrongKind,

    #[error("failed to sign token")]
    Signing,
}

/// An access/refresh pair as returned by the token endpoint.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and verifies HS256 bearer tokens.
pub struct Hs256Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl Hs256Tokens {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
            validation,
        }
    }

    /// Mint the access/refresh pair for an authenticated principal.
    pub fn issue_pair(&self, principal: &Principal) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.issue(principal, TokenKind::Access)?,
            refresh: self.issue(principal, TokenKind::Refresh)?,
        })
    }

    /// Mint a fresh access token (the refresh exchange).
    pub fn issue_access(&self, principal: &Principal) -> Result<String, TokenError> {
        self.issue(principal, TokenKind::Access)
    }

    fn issue(&self, principal: &Principal, kind: TokenKind) -> Result<String, TokenError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: principal.id,
            username: principal.username.clone(),
            roles: principal.roles.clone(),
            superuser: principal.superuser,
            token_type: kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }

    /// Verify a bearer credential. Refresh tokens are not bearer credentials.
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.token_type != TokenKind::Access {
            return Err(TokenError::WrongKind);
        }
        Ok(claims)
    }

    /// Verify a token presented to the refresh exchange.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.token_type != TokenKind::Refresh {
            return Err(TokenError::WrongKind);
        }
        Ok(claims)
    }
}

//! # JWT sessions
//!
//! HS256 tokens whose `sub` is the user id. The identity provider mints
//! them; `issue` exists for seeding and tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use domains::{Session, SessionResolver};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid,
    #[serde(default)]
    pub email_verified: bool,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtSessionResolver {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtSessionResolver {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    pub fn issue(&self, user_id: Uuid, email_verified: bool, ttl: Duration) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id,
            email_verified,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, bearer_token: &str) -> anyhow::Result<Option<Session>> {
        match decode::<JwtClaims>(bearer_token, &self.decoding, &self.validation) {
            Ok(data) => Ok(Some(Session {
                user_id: data.claims.sub,
                email_verified: data.claims.email_verified,
            })),
            Err(err) => {
                tracing::debug!(error = %err, "rejected bearer token");
                Ok(None)
            }
        }
    }
}

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::identity::{Identity, IdentityProvider};
use crate::utils::time;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub iat: usize,
    pub exp: usize,
    pub role: Option<String>,
}

/// Identity provider that signs HS256 tokens for whoever is signed in.
pub struct JwtIdentityProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    audience: String,
    ttl: Duration,
    current: RwLock<Option<Identity>>,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str, audience: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            audience: audience.into(),
            ttl,
            current: RwLock::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.token_audience.clone(), config.token_ttl)
    }

    pub fn sign_in(&self, identity: Identity) {
        info!(user_id = %identity.id, role = ?identity.role, "signed in");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(identity);
    }

    pub fn sign_out(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(identity) = previous {
            info!(user_id = %identity.id, "signed out");
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[self.audience.as_str()]);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    fn issue(&self, identity: &Identity) -> Result<String> {
        let issued_at = time::now().timestamp().max(0) as usize;
        let claims = Claims {
            sub: identity.id.clone(),
            aud: self.audience.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(usize::try_from(self.ttl.as_secs()).unwrap_or(usize::MAX)),
            role: identity.role.map(|role| role.as_str().to_string()),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    fn current_user(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn bearer_token(&self) -> Result<String> {
        let identity = self
            .current_user()
            .ok_or_else(|| Error::NoCredential("no active session".to_string()))?;
        self.issue(&identity)
    }
}

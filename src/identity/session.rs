use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::identity::{CredentialSupplier, Identity, IdentityProvider};

/// One signed-in user, created at sign-in and ended at sign-out.
///
/// Ending the session cancels its lifetime token, which every operation built
/// from the session derives its own cancellation from.
#[derive(Clone)]
pub struct Session {
    identity: Identity,
    credentials: Arc<SessionCredentials>,
}

/// Fetches a fresh token from the provider on every request while the session lives.
pub struct SessionCredentials {
    provider: Arc<dyn IdentityProvider>,
    ended: CancellationToken,
}

impl Session {
    pub fn start(provider: Arc<dyn IdentityProvider>) -> Result<Self> {
        let identity = provider
            .current_user()
            .ok_or_else(|| Error::NoCredential("no signed-in user".to_string()))?;
        info!(user_id = %identity.id, role = ?identity.role, "session started");
        Ok(Self {
            identity,
            credentials: Arc::new(SessionCredentials {
                provider,
                ended: CancellationToken::new(),
            }),
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn credentials(&self) -> Arc<dyn CredentialSupplier> {
        self.credentials.clone()
    }

    pub fn lifetime(&self) -> CancellationToken {
        self.credentials.ended.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.credentials.ended.is_cancelled()
    }

    pub fn end(&self) {
        if self.is_active() {
            info!(user_id = %self.identity.id, "session ended");
        }
        self.credentials.ended.cancel();
    }
}

#[async_trait]
impl CredentialSupplier for SessionCredentials {
    async fn bearer_token(&self) -> Result<String> {
        if self.ended.is_cancelled() {
            return Err(Error::NoCredential("session has ended".to_string()));
        }
        let token = self.provider.bearer_token().await.map_err(|err| match err {
            Error::NoCredential(msg) => Error::NoCredential(msg),
            other => Error::NoCredential(other.to_string()),
        })?;
        if self.ended.is_cancelled() {
            debug!("session ended while a token was being issued");
            return Err(Error::NoCredential("session has ended".to_string()));
        }
        Ok(token)
    }
}

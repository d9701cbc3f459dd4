//! Who is signed in and how their bearer credential is obtained.
//!
//! The identity provider is an external collaborator; the crate only depends on
//! the [`IdentityProvider`] and [`CredentialSupplier`] seams. A [`Session`] binds
//! one signed-in identity to the credentials handed to every remote operation.

pub mod jwt;
pub mod session;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub use jwt::{Claims, JwtIdentityProvider};
pub use session::{Session, SessionCredentials};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Recruiter,
    Candidate,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Recruiter => "recruiter",
            Role::Candidate => "candidate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "recruiter" => Ok(Role::Recruiter),
            "candidate" => Ok(Role::Candidate),
            other => Err(Error::DataIntegrity(format!("unknown role '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    /// Unset until the user picks a side during onboarding.
    pub role: Option<Role>,
}

impl Identity {
    pub fn new(id: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_recruiter(&self) -> bool {
        self.role == Some(Role::Recruiter)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<Identity>;

    /// Issues a short-lived bearer token. Fails when no session is active.
    async fn bearer_token(&self) -> Result<String>;
}

/// Source of a fresh bearer token for each remote call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialSupplier: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

pub mod client;
pub mod config;
pub mod derivation;
pub mod dto;
pub mod error;
pub mod fetch;
pub mod identity;
pub mod listing;
pub mod models;
pub mod pagination;
pub mod saved;
pub mod services;
pub mod utils;

pub use client::{Dashboard, JobBoardClient};
pub use error::{Error, Failure, FailureKind, Result};
pub use fetch::{AsyncOperation, OperationState, Settlement, SettlementPolicy};
pub use identity::{CredentialSupplier, Identity, IdentityProvider, Role, Session};
pub use services::{JobBoardService, RestDataService};

//! Uniform async execution contract for remote reads and writes.
//!
//! An [`AsyncOperation`] binds one remote call and its fixed parameters to a
//! credential supplier and exposes the call's observable [`OperationState`].

pub mod operation;
pub mod state;

pub use operation::{AsyncOperation, Settlement, SettlementPolicy};
pub use state::OperationState;

use serde::Serialize;

use crate::error::Failure;

/// Result, pending flag and failure of an operation, as last settled.
///
/// Nothing is cleared when a new trigger starts: the previous result and
/// failure stay visible until the next settlement overwrites them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationState<T> {
    pub result: Option<T>,
    pub pending: bool,
    pub error: Option<Failure>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            result: None,
            pending: false,
            error: None,
        }
    }
}

impl<T> OperationState<T> {
    pub fn is_idle(&self) -> bool {
        self.result.is_none() && !self.pending && self.error.is_none()
    }
}

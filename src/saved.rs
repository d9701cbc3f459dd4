use serde::Serialize;

use crate::dto::saved_dto::SaveKey;
use crate::fetch::{AsyncOperation, Settlement};
use crate::models::SavedJob;

pub type SaveOperation = AsyncOperation<SaveKey, bool, Vec<SavedJob>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveState {
    Unsaved,
    Saved,
    Pending,
}

/// Save button of one job card.
///
/// The operation is called with the currently displayed saved flag (delete
/// when saved, insert otherwise). Afterwards the flag is read back from the
/// rows the service returned, not from the branch that was taken.
pub struct SaveToggle {
    operation: SaveOperation,
    saved_initially: bool,
}

impl SaveToggle {
    pub fn new(operation: SaveOperation, saved_initially: bool) -> Self {
        Self {
            operation,
            saved_initially,
        }
    }

    pub fn operation(&self) -> &SaveOperation {
        &self.operation
    }

    pub fn is_saved(&self) -> bool {
        match self.operation.result() {
            Some(rows) => !rows.is_empty(),
            None => self.saved_initially,
        }
    }

    pub fn state(&self) -> SaveState {
        if self.operation.pending() {
            SaveState::Pending
        } else if self.is_saved() {
            SaveState::Saved
        } else {
            SaveState::Unsaved
        }
    }

    pub async fn toggle(&self) -> Settlement {
        let is_saved = self.is_saved();
        self.operation.trigger(is_saved).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, FailureKind};
    use crate::identity::{CredentialSupplier, MockCredentialSupplier};
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, task};

    fn credentials() -> Arc<dyn CredentialSupplier> {
        let mut supplier = MockCredentialSupplier::new();
        supplier
            .expect_bearer_token()
            .returning(|| Ok("token".to_string()));
        Arc::new(supplier)
    }

    fn key() -> SaveKey {
        SaveKey {
            candidate_id: "user_c".to_string(),
            job_id: 12,
        }
    }

    fn row() -> SavedJob {
        SavedJob {
            id: 1,
            user_id: "user_c".to_string(),
            job_id: 12,
            job: None,
        }
    }

    /// Replies with `rows` and records which branch was requested.
    fn toggle_with(
        saved_initially: bool,
        rows: Vec<SavedJob>,
        branches: Arc<Mutex<Vec<bool>>>,
    ) -> SaveToggle {
        let operation = AsyncOperation::new(
            "toggle_saved_job",
            credentials(),
            key(),
            move |_token, _key, is_saved: bool| {
                branches.lock().unwrap().push(is_saved);
                let rows = rows.clone();
                async move { Ok::<_, Error>(rows) }
            },
        );
        SaveToggle::new(operation, saved_initially)
    }

    #[tokio::test]
    async fn saved_with_empty_delete_response_becomes_unsaved() {
        let branches = Arc::new(Mutex::new(Vec::new()));
        let toggle = toggle_with(true, Vec::new(), branches.clone());
        assert_eq!(toggle.state(), SaveState::Saved);

        toggle.toggle().await;

        assert_eq!(*branches.lock().unwrap(), vec![true]);
        assert_eq!(toggle.state(), SaveState::Unsaved);
    }

    #[tokio::test]
    async fn unsaved_with_inserted_row_becomes_saved() {
        let branches = Arc::new(Mutex::new(Vec::new()));
        let toggle = toggle_with(false, vec![row()], branches.clone());

        toggle.toggle().await;

        assert_eq!(*branches.lock().unwrap(), vec![false]);
        assert_eq!(toggle.state(), SaveState::Saved);
    }

    #[tokio::test]
    async fn state_follows_returned_rows_not_branch() {
        let branches = Arc::new(Mutex::new(Vec::new()));
        let toggle = toggle_with(true, vec![row()], branches.clone());

        toggle.toggle().await;

        assert_eq!(*branches.lock().unwrap(), vec![true]);
        assert!(toggle.is_saved());
    }

    #[tokio::test]
    async fn pending_while_request_in_flight() {
        let (tx, rx) = oneshot::channel::<Vec<SavedJob>>();
        let rx = Arc::new(Mutex::new(Some(rx)));
        let operation = AsyncOperation::new("toggle_saved_job", credentials(), key(), move |_t, _k, _s: bool| {
            let rx = rx.lock().unwrap().take();
            async move {
                match rx {
                    Some(rx) => rx.await.map_err(|_| Error::RemoteOperationFailed("dropped".into())),
                    None => Err(Error::RemoteOperationFailed("already used".into())),
                }
            }
        });
        let toggle = SaveToggle::new(operation, false);

        let mut pending = task::spawn(toggle.toggle());
        assert_pending!(pending.poll());
        assert_eq!(toggle.state(), SaveState::Pending);

        tx.send(vec![row()]).unwrap();
        let _ = pending.poll();
        drop(pending);
        assert_eq!(toggle.state(), SaveState::Saved);
    }

    #[tokio::test]
    async fn teardown_mid_request_leaves_toggle_idle() {
        let operation = AsyncOperation::new("toggle_saved_job", credentials(), key(), |_t, _k, _s: bool| {
            std::future::pending::<crate::error::Result<Vec<SavedJob>>>()
        });
        let toggle = SaveToggle::new(operation, true);

        let mut pending = task::spawn(toggle.toggle());
        assert_pending!(pending.poll());
        assert_eq!(toggle.state(), SaveState::Pending);

        toggle.operation().teardown();
        assert_eq!(pending.poll(), std::task::Poll::Ready(Settlement::Cancelled));
        drop(pending);

        assert_eq!(toggle.state(), SaveState::Saved);
        assert!(!toggle.operation().pending());
    }

    #[tokio::test]
    async fn failed_toggle_keeps_previous_state() {
        let operation = AsyncOperation::new("toggle_saved_job", credentials(), key(), |_t, _k, _s: bool| async {
            Err::<Vec<SavedJob>, _>(Error::RemoteOperationFailed("row level security".into()))
        });
        let toggle = SaveToggle::new(operation, true);

        toggle.toggle().await;

        assert_eq!(toggle.state(), SaveState::Saved);
        assert_eq!(
            toggle.operation().error().map(|f| f.kind),
            Some(FailureKind::RemoteOperationFailed)
        );
    }
}

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Error, Failure, Result};
use crate::fetch::state::OperationState;
use crate::identity::CredentialSupplier;

type OperationFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

type RemoteCall<P, A, T> = Arc<dyn Fn(String, P, A) -> OperationFuture<T> + Send + Sync>;

/// Which settlement wins when triggers overlap on one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettlementPolicy {
    /// Only the most recently dispatched trigger may commit; older ones are stale.
    #[default]
    Sequenced,
    /// Every settlement commits; the last one to settle is what stays visible.
    LastSettled,
}

impl fmt::Display for SettlementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementPolicy::Sequenced => f.write_str("sequenced"),
            SettlementPolicy::LastSettled => f.write_str("last-settled"),
        }
    }
}

impl FromStr for SettlementPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequenced" => Ok(SettlementPolicy::Sequenced),
            "last-settled" | "last_settled" => Ok(SettlementPolicy::LastSettled),
            other => Err(Error::Config(format!(
                "unknown settlement policy '{}', expected 'sequenced' or 'last-settled'",
                other
            ))),
        }
    }
}

/// How a single trigger ended, from the wrapper's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The outcome was written to the operation state.
    Applied,
    /// A newer trigger was dispatched meanwhile; the outcome was dropped.
    Stale,
    /// The trigger's cancellation handle fired; nothing was committed.
    Cancelled,
}

/// A remote call bound to its fixed parameters, with observable state.
///
/// `trigger` fetches a fresh bearer token, calls the remote operation with
/// `(token, fixed params, call args)` and settles the outcome into
/// [`OperationState`]. It never fails to the caller; failures land in
/// `state().error` and leave the previous `result` in place.
pub struct AsyncOperation<P, A, T> {
    name: &'static str,
    call: RemoteCall<P, A, T>,
    params: P,
    credentials: Arc<dyn CredentialSupplier>,
    policy: SettlementPolicy,
    lifetime: CancellationToken,
    dispatched: AtomicU64,
    state: watch::Sender<OperationState<T>>,
}

impl<P, A, T> AsyncOperation<P, A, T>
where
    P: Clone + Send + Sync + 'static,
    A: Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(
        name: &'static str,
        credentials: Arc<dyn CredentialSupplier>,
        params: P,
        call: F,
    ) -> Self
    where
        F: Fn(String, P, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let call: RemoteCall<P, A, T> =
            Arc::new(move |token, params, args| Box::pin(call(token, params, args)));
        let (state, _) = watch::channel(OperationState::default());
        Self {
            name,
            call,
            params,
            credentials,
            policy: SettlementPolicy::default(),
            lifetime: CancellationToken::new(),
            dispatched: AtomicU64::new(0),
            state,
        }
    }

    pub fn with_policy(mut self, policy: SettlementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ties the operation to a parent lifetime (usually the session's).
    pub fn with_lifetime(mut self, parent: &CancellationToken) -> Self {
        self.lifetime = parent.child_token();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    pub fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    pub fn state(&self) -> OperationState<T> {
        self.state.borrow().clone()
    }

    pub fn result(&self) -> Option<T> {
        self.state.borrow().result.clone()
    }

    pub fn pending(&self) -> bool {
        self.state.borrow().pending
    }

    pub fn error(&self) -> Option<Failure> {
        self.state.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationState<T>> {
        self.state.subscribe()
    }

    /// A handle for [`trigger_with`](Self::trigger_with); also fires on teardown.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.lifetime.child_token()
    }

    /// Cancels every outstanding trigger; none of them will commit.
    pub fn teardown(&self) {
        debug!(operation = self.name, "tearing down");
        self.lifetime.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    pub async fn trigger(&self, args: A) -> Settlement {
        self.trigger_with(args, self.cancel_handle()).await
    }

    pub async fn trigger_with(&self, args: A, cancel: CancellationToken) -> Settlement {
        let seq = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(operation = self.name, seq, "dispatching");

        let token = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            token = self.credentials.bearer_token() => Some(token),
        };
        let token = match token {
            None => return self.abandon(seq),
            Some(Ok(token)) => token,
            Some(Err(err)) => return self.settle(seq, &cancel, Err(err)),
        };

        self.state.send_modify(|state| state.pending = true);
        let call = (self.call)(token, self.params.clone(), args);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            outcome = call => Some(outcome),
        };
        match outcome {
            None => self.abandon(seq),
            Some(outcome) => self.settle(seq, &cancel, outcome),
        }
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.dispatched.load(Ordering::SeqCst) == seq
    }

    fn settle(&self, seq: u64, cancel: &CancellationToken, outcome: Result<T>) -> Settlement {
        if cancel.is_cancelled() {
            return self.abandon(seq);
        }
        if self.policy == SettlementPolicy::Sequenced && !self.is_latest(seq) {
            debug!(operation = self.name, seq, "discarding stale settlement");
            return Settlement::Stale;
        }

        if let Err(err) = &outcome {
            warn!(operation = self.name, seq, error = %err, "operation failed");
        } else {
            debug!(operation = self.name, seq, "operation settled");
        }
        self.state.send_modify(|state| {
            state.pending = false;
            match outcome {
                Ok(value) => {
                    state.result = Some(value);
                    state.error = None;
                }
                Err(err) => state.error = Some(Failure::from(&err)),
            }
        });
        Settlement::Applied
    }

    fn abandon(&self, seq: u64) -> Settlement {
        debug!(operation = self.name, seq, "trigger cancelled before settlement");
        let owns_pending = self.policy == SettlementPolicy::LastSettled || self.is_latest(seq);
        if owns_pending {
            self.state
                .send_if_modified(|state| std::mem::replace(&mut state.pending, false));
        }
        Settlement::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::identity::MockCredentialSupplier;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    type Reply = oneshot::Receiver<Result<u32>>;

    fn credentials() -> Arc<dyn CredentialSupplier> {
        let mut supplier = MockCredentialSupplier::new();
        supplier
            .expect_bearer_token()
            .returning(|| Ok("token".to_string()));
        Arc::new(supplier)
    }

    /// Each trigger settles with whatever is sent on its reply channel.
    fn controlled(policy: SettlementPolicy) -> AsyncOperation<(), Reply, u32> {
        AsyncOperation::new("controlled", credentials(), (), |_token, _params, reply: Reply| {
            async move {
                reply
                    .await
                    .map_err(|_| Error::RemoteOperationFailed("reply dropped".to_string()))?
            }
        })
        .with_policy(policy)
    }

    #[test]
    fn starts_idle() {
        let op = controlled(SettlementPolicy::Sequenced);
        assert!(op.state().is_idle());
    }

    #[tokio::test]
    async fn passes_token_fixed_params_and_args() {
        let op = AsyncOperation::new(
            "echo",
            credentials(),
            "fixed".to_string(),
            |token, params: String, args: &'static str| async move {
                Ok::<_, Error>(format!("{}|{}|{}", token, params, args))
            },
        );

        assert_eq!(op.trigger("call").await, Settlement::Applied);
        assert_eq!(op.result().as_deref(), Some("token|fixed|call"));
        assert!(!op.pending());
    }

    #[tokio::test]
    async fn pending_while_in_flight() {
        let op = controlled(SettlementPolicy::Sequenced);
        let (tx, rx) = oneshot::channel();

        let mut trigger = task::spawn(op.trigger(rx));
        assert_pending!(trigger.poll());
        assert!(op.pending());

        tx.send(Ok(7)).unwrap();
        assert_ready_eq!(trigger.poll(), Settlement::Applied);
        drop(trigger);

        let state = op.state();
        assert_eq!(state.result, Some(7));
        assert!(!state.pending);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn failure_keeps_previous_result() {
        let op = controlled(SettlementPolicy::Sequenced);

        let (tx, rx) = oneshot::channel();
        tx.send(Ok(1)).unwrap();
        op.trigger(rx).await;

        let (tx, rx) = oneshot::channel();
        tx.send(Err(Error::RemoteOperationFailed("boom".to_string())))
            .unwrap();
        assert_eq!(op.trigger(rx).await, Settlement::Applied);

        let state = op.state();
        assert_eq!(state.result, Some(1));
        assert!(!state.pending);
        let failure = state.error.unwrap();
        assert_eq!(failure.kind, FailureKind::RemoteOperationFailed);
        assert_eq!(failure.message, "boom");
    }

    #[tokio::test]
    async fn previous_result_visible_during_reload() {
        let op = controlled(SettlementPolicy::Sequenced);
        let (tx, rx) = oneshot::channel();
        tx.send(Ok(1)).unwrap();
        op.trigger(rx).await;

        let (_tx, rx) = oneshot::channel();
        let mut reload = task::spawn(op.trigger(rx));
        assert_pending!(reload.poll());

        let state = op.state();
        assert!(state.pending);
        assert_eq!(state.result, Some(1));
    }

    #[tokio::test]
    async fn missing_credential_skips_remote_call() {
        let mut supplier = MockCredentialSupplier::new();
        supplier
            .expect_bearer_token()
            .returning(|| Err(Error::NoCredential("no active session".to_string())));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let op = AsyncOperation::new("guarded", Arc::new(supplier), (), move |_t, _p, _a: ()| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<u32, Error>(1) }
        });

        assert_eq!(op.trigger(()).await, Settlement::Applied);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let state = op.state();
        assert_eq!(state.error.unwrap().kind, FailureKind::NoCredential);
        assert!(!state.pending);
        assert!(state.result.is_none());
    }

    #[tokio::test]
    async fn last_settled_wins_in_parity_mode() {
        let op = controlled(SettlementPolicy::LastSettled);
        let (tx_slow, rx_slow) = oneshot::channel();
        let (tx_fast, rx_fast) = oneshot::channel();

        let mut slow = task::spawn(op.trigger(rx_slow));
        let mut fast = task::spawn(op.trigger(rx_fast));
        assert_pending!(slow.poll());
        assert_pending!(fast.poll());

        tx_fast.send(Ok(2)).unwrap();
        assert_ready_eq!(fast.poll(), Settlement::Applied);
        assert!(!op.pending());

        tx_slow.send(Ok(1)).unwrap();
        assert_ready_eq!(slow.poll(), Settlement::Applied);

        assert_eq!(op.result(), Some(1));
    }

    #[tokio::test]
    async fn sequenced_mode_drops_stale_settlements() {
        let op = controlled(SettlementPolicy::Sequenced);
        let (tx_slow, rx_slow) = oneshot::channel();
        let (tx_fast, rx_fast) = oneshot::channel();

        let mut slow = task::spawn(op.trigger(rx_slow));
        let mut fast = task::spawn(op.trigger(rx_fast));
        assert_pending!(slow.poll());
        assert_pending!(fast.poll());

        tx_fast.send(Ok(2)).unwrap();
        assert_ready_eq!(fast.poll(), Settlement::Applied);

        tx_slow.send(Ok(1)).unwrap();
        assert_ready_eq!(slow.poll(), Settlement::Stale);

        assert_eq!(op.result(), Some(2));
        assert!(!op.pending());
    }

    #[tokio::test]
    async fn stale_settlement_does_not_clear_pending() {
        let op = controlled(SettlementPolicy::Sequenced);
        let (tx_first, rx_first) = oneshot::channel();
        let (_tx_second, rx_second) = oneshot::channel();

        let mut first = task::spawn(op.trigger(rx_first));
        let mut second = task::spawn(op.trigger(rx_second));
        assert_pending!(first.poll());
        assert_pending!(second.poll());

        tx_first.send(Ok(1)).unwrap();
        assert_ready_eq!(first.poll(), Settlement::Stale);
        assert!(op.pending());
        assert!(op.result().is_none());
    }

    #[tokio::test]
    async fn cancelled_trigger_never_commits() {
        let op = controlled(SettlementPolicy::Sequenced);
        let (tx, rx) = oneshot::channel();
        let handle = op.cancel_handle();

        let mut trigger = task::spawn(op.trigger_with(rx, handle.clone()));
        assert_pending!(trigger.poll());

        handle.cancel();
        let _ = tx.send(Ok(9));
        assert_ready_eq!(trigger.poll(), Settlement::Cancelled);
        drop(trigger);

        let state = op.state();
        assert!(state.result.is_none());
        assert!(state.error.is_none());
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn teardown_discards_in_flight_results() {
        let op = controlled(SettlementPolicy::LastSettled);
        let (tx, rx) = oneshot::channel();

        let mut trigger = task::spawn(op.trigger(rx));
        assert_pending!(trigger.poll());

        op.teardown();
        let _ = tx.send(Ok(3));
        assert_ready_eq!(trigger.poll(), Settlement::Cancelled);
        drop(trigger);

        assert!(op.is_torn_down());
        assert!(op.result().is_none());
        assert!(!op.pending());
    }

    #[tokio::test]
    async fn parent_lifetime_cancels_operation() {
        let session = CancellationToken::new();
        let op = controlled(SettlementPolicy::Sequenced).with_lifetime(&session);
        let (_tx, rx) = oneshot::channel();

        let mut trigger = task::spawn(op.trigger(rx));
        assert_pending!(trigger.poll());

        session.cancel();
        assert_ready_eq!(trigger.poll(), Settlement::Cancelled);
    }

    #[tokio::test]
    async fn subscribers_observe_settlement() {
        let op = controlled(SettlementPolicy::Sequenced);
        let mut rx_state = op.subscribe();
        let (tx, rx) = oneshot::channel();
        tx.send(Ok(5)).unwrap();

        op.trigger(rx).await;

        rx_state.changed().await.unwrap();
        assert_eq!(rx_state.borrow_and_update().result, Some(5));
    }

    #[test]
    fn policy_parsing() {
        assert_eq!(
            "sequenced".parse::<SettlementPolicy>().unwrap(),
            SettlementPolicy::Sequenced
        );
        assert_eq!(
            "Last-Settled".parse::<SettlementPolicy>().unwrap(),
            SettlementPolicy::LastSettled
        );
        assert!("fifo".parse::<SettlementPolicy>().is_err());
        assert_eq!(SettlementPolicy::LastSettled.to_string(), "last-settled");
    }
}

use std::sync::mpsc::Sender;
use std::time::Duration;

use prcopilot_core::review::Decision;
use prcopilot_core::summary::PrSummary;
use tokio::runtime::Runtime;
use tracing::warn;

use crate::{HttpService, ReviewService, ServiceError};

/// The result of one decision command, reported back to the UI thread.
#[derive(Debug)]
pub struct DecisionOutcome {
    pub pr_id: i64,
    pub decision: Decision,
    pub result: Result<(), ServiceError>,
}

/// Blocking wrapper around the async `HttpService`.
///
/// Creates an internal tokio runtime. List fetches use `block_on()`;
/// decision commands are spawned onto the runtime's background workers so
/// the UI thread never waits on them. Designed for sync callers like the
/// TUI. Dropping the service shuts the runtime down, aborting any
/// in-flight request.
pub struct BlockingHttpService {
    inner: HttpService,
    rt: Runtime,
}

impl BlockingHttpService {
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: HttpService::new(base_url),
            rt: Runtime::new().expect("failed to create tokio runtime"),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            inner: HttpService::with_timeout(base_url, timeout),
            rt: Runtime::new().expect("failed to create tokio runtime"),
        }
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn list_summaries(&self) -> Result<Vec<PrSummary>, ServiceError> {
        self.rt.block_on(self.inner.list_summaries())
    }

    /// Dispatch a decision command without blocking the caller.
    ///
    /// The command runs on the internal runtime; its outcome is delivered
    /// on `tx` for the caller's event loop to drain. Commands for
    /// different PRs may be in flight concurrently; the service imposes no
    /// ordering between them.
    pub fn spawn_decision(&self, pr_id: i64, decision: Decision, tx: Sender<DecisionOutcome>) {
        let service = self.inner.clone();
        self.rt.spawn(async move {
            let result = service.submit_decision(pr_id, decision).await;
            if let Err(ref e) = result {
                warn!("{} command for PR #{pr_id} failed: {e}", decision.as_str());
            }
            // The receiver may already be gone during teardown.
            let _ = tx.send(DecisionOutcome {
                pr_id,
                decision,
                result,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::test_helpers::{spawn_backend, MockBackend};
    use prcopilot_core::summary::PrSummary;

    /// Spawn the mock backend on a background thread (the blocking service
    /// creates its own tokio runtime and cannot be nested inside another).
    /// The backend stays alive indefinitely via `std::future::pending()`.
    fn spawn_blocking_backend(summaries: Vec<PrSummary>) -> MockBackend {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let backend = spawn_backend(summaries).await;
                tx.send(backend).unwrap();
                std::future::pending::<()>().await;
            });
        });
        rx.recv().unwrap()
    }

    fn sample() -> Vec<PrSummary> {
        vec![
            PrSummary {
                pr_id: 1,
                summary: "Fix bug".into(),
            },
            PrSummary {
                pr_id: 2,
                summary: "Add tests".into(),
            },
        ]
    }

    fn recv_outcome(rx: &std::sync::mpsc::Receiver<DecisionOutcome>) -> DecisionOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Ok(outcome) = rx.try_recv() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "no outcome within 5s");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn blocking_list_preserves_order() {
        let backend = spawn_blocking_backend(sample());
        let svc = BlockingHttpService::new(&backend.base_url);

        let summaries = svc.list_summaries().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].pr_id, 1);
        assert_eq!(summaries[1].pr_id, 2);
    }

    #[test]
    fn spawned_approve_reports_success() {
        let backend = spawn_blocking_backend(sample());
        let svc = BlockingHttpService::new(&backend.base_url);
        let (tx, rx) = channel();

        svc.spawn_decision(1, Decision::Approve, tx);
        let outcome = recv_outcome(&rx);
        assert_eq!(outcome.pr_id, 1);
        assert_eq!(outcome.decision, Decision::Approve);
        assert!(outcome.result.is_ok());
        assert!(backend
            .requests()
            .contains(&"POST /pr/1/approve".to_string()));
    }

    #[test]
    fn spawned_reject_reports_failure() {
        let backend = spawn_blocking_backend(sample());
        backend.set_fail_decisions(true);
        let svc = BlockingHttpService::new(&backend.base_url);
        let (tx, rx) = channel();

        svc.spawn_decision(2, Decision::Reject, tx);
        let outcome = recv_outcome(&rx);
        assert_eq!(outcome.pr_id, 2);
        assert!(matches!(
            outcome.result,
            Err(ServiceError::Backend { status: 500, .. })
        ));
    }

    #[test]
    fn concurrent_decisions_all_complete() {
        let backend = spawn_blocking_backend(sample());
        let svc = BlockingHttpService::new(&backend.base_url);
        let (tx, rx) = channel();

        svc.spawn_decision(1, Decision::Approve, tx.clone());
        svc.spawn_decision(2, Decision::Reject, tx);

        let first = recv_outcome(&rx);
        let second = recv_outcome(&rx);
        assert!(first.result.is_ok());
        assert!(second.result.is_ok());

        let requests = backend.requests();
        assert!(requests.contains(&"POST /pr/1/approve".to_string()));
        assert!(requests.contains(&"POST /pr/2/reject".to_string()));
    }
}

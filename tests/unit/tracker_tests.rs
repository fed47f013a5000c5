//! Transaction Tracker Unit Tests
//!
//! Drives the tracker with scripted collaborators and checks:
//! - Status observed by the collaborators while they run
//! - Error messages recorded on failure
//! - Reset from every state, including mid-flight
//! - Faults from either collaborator

use async_trait::async_trait;
use solkit::error::TransactionError;
use solkit::transaction::{
    BlockReference, ConfirmationOutcome, SimulatedNetwork, TrackerSnapshot, TransactionConfirmer,
    TransactionStatus, TransactionSubmitter, TransactionTracker, DEFAULT_ERROR_MESSAGE,
    SIMULATED_FAILURE, SIMULATED_SIGNATURE,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::{watch, Notify};

/// Collaborator that records the tracker status it observes
struct Observing {
    updates: OnceLock<watch::Receiver<TrackerSnapshot>>,
    submit: Result<String, TransactionError>,
    confirm: Result<ConfirmationOutcome, TransactionError>,
    seen_on_submit: parking_lot::Mutex<Option<TrackerSnapshot>>,
    seen_on_confirm: parking_lot::Mutex<Option<TrackerSnapshot>>,
    confirm_calls: AtomicUsize,
}

impl Observing {
    fn new(
        submit: Result<String, TransactionError>,
        confirm: Result<ConfirmationOutcome, TransactionError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            updates: OnceLock::new(),
            submit,
            confirm,
            seen_on_submit: parking_lot::Mutex::new(None),
            seen_on_confirm: parking_lot::Mutex::new(None),
            confirm_calls: AtomicUsize::new(0),
        })
    }

    fn current(&self) -> Option<TrackerSnapshot> {
        self.updates.get().map(|rx| rx.borrow().clone())
    }
}

#[async_trait]
impl TransactionSubmitter<u32> for Observing {
    async fn submit(&self, _payload: u32) -> Result<String, TransactionError> {
        *self.seen_on_submit.lock() = self.current();
        self.submit.clone()
    }
}

#[async_trait]
impl TransactionConfirmer for Observing {
    async fn latest_reference(&self) -> Result<BlockReference, TransactionError> {
        Ok(BlockReference {
            blockhash: "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N".to_string(),
            last_valid_block_height: 150,
        })
    }

    async fn confirm(
        &self,
        _txid: &str,
        _reference: &BlockReference,
    ) -> Result<ConfirmationOutcome, TransactionError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_on_confirm.lock() = self.current();
        self.confirm.clone()
    }
}

fn observed_tracker(network: &Arc<Observing>) -> TransactionTracker<u32> {
    let tracker = TransactionTracker::with_network(network.clone());
    let _ = network.updates.set(tracker.subscribe());
    tracker
}

#[tokio::test]
async fn test_success_path_observed_states() {
    let network = Observing::new(Ok("5xSig".into()), Ok(ConfirmationOutcome::Finalized));
    let tracker = observed_tracker(&network);

    tracker.execute(7).await;

    let on_submit = network.seen_on_submit.lock().clone().unwrap();
    assert_eq!(on_submit.status, TransactionStatus::Sending);
    assert_eq!(on_submit.txid, None, "No txid before submission returns");

    let on_confirm = network.seen_on_confirm.lock().clone().unwrap();
    assert_eq!(on_confirm.status, TransactionStatus::Confirming);
    assert_eq!(on_confirm.txid.as_deref(), Some("5xSig"));

    assert_eq!(
        tracker.snapshot(),
        TrackerSnapshot {
            status: TransactionStatus::Success,
            txid: Some("5xSig".into()),
            error: None,
        }
    );
}

#[tokio::test]
async fn test_submission_failure_skips_confirmation() {
    let network = Observing::new(
        Err(TransactionError::Submission("network down".into())),
        Ok(ConfirmationOutcome::Finalized),
    );
    let tracker = observed_tracker(&network);

    tracker.execute(1).await;

    assert_eq!(tracker.status(), TransactionStatus::Error);
    assert_eq!(tracker.error().as_deref(), Some("network down"));
    assert_eq!(tracker.txid(), None);
    assert_eq!(
        network.confirm_calls.load(Ordering::SeqCst),
        0,
        "Confirmation must not be attempted without a signature"
    );
}

#[tokio::test]
async fn test_blank_error_uses_default_message() {
    let network = Observing::new(
        Err(TransactionError::Submission(String::new())),
        Ok(ConfirmationOutcome::Finalized),
    );
    let tracker = observed_tracker(&network);

    tracker.execute(1).await;

    assert_eq!(tracker.status(), TransactionStatus::Error);
    assert_eq!(tracker.error().as_deref(), Some(DEFAULT_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_confirmation_fault_keeps_txid() {
    let network = Observing::new(
        Ok("5xSig".into()),
        Err(TransactionError::Confirmation("blockhash expired".into())),
    );
    let tracker = observed_tracker(&network);

    tracker.execute(1).await;

    assert_eq!(tracker.status(), TransactionStatus::Error);
    assert_eq!(tracker.txid().as_deref(), Some("5xSig"));
    assert_eq!(tracker.error().as_deref(), Some("blockhash expired"));
}

#[tokio::test]
async fn test_reset_clears_terminal_states() {
    let cases = [
        Observing::new(Ok("ok".into()), Ok(ConfirmationOutcome::Finalized)),
        Observing::new(
            Ok("bad".into()),
            Ok(ConfirmationOutcome::Failed("InstructionError".into())),
        ),
    ];

    for network in cases {
        let tracker = observed_tracker(&network);
        tracker.execute(1).await;
        assert!(tracker.status().is_terminal());

        tracker.reset();
        assert_eq!(tracker.snapshot(), TrackerSnapshot::default());
        assert!(tracker.explorer_url().is_none());
    }
}

#[tokio::test]
async fn test_execute_again_after_error() {
    let network = Observing::new(
        Err(TransactionError::Submission("rejected".into())),
        Ok(ConfirmationOutcome::Finalized),
    );
    let tracker = observed_tracker(&network);

    tracker.execute(1).await;
    assert_eq!(tracker.status(), TransactionStatus::Error);

    tracker.execute(2).await;
    assert_eq!(tracker.status(), TransactionStatus::Error);
    assert_eq!(tracker.error().as_deref(), Some("rejected"));

    let on_submit = network.seen_on_submit.lock().clone().unwrap();
    assert_eq!(on_submit.status, TransactionStatus::Sending);
    assert_eq!(on_submit.error, None, "Stale error cleared on re-execute");
}

/// Which collaborator call waits for the test to release it
#[derive(Clone, Copy, PartialEq, Eq)]
enum Stage {
    Submit,
    Confirm,
}

/// Network that blocks at one stage until released
struct Gated {
    stage: Stage,
    entered: Notify,
    release: Notify,
}

impl Gated {
    fn new(stage: Stage) -> Arc<Self> {
        Arc::new(Self {
            stage,
            entered: Notify::new(),
            release: Notify::new(),
        })
    }

    async fn hold(&self, stage: Stage) {
        if self.stage == stage {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl TransactionSubmitter<()> for Gated {
    async fn submit(&self, _payload: ()) -> Result<String, TransactionError> {
        self.hold(Stage::Submit).await;
        Ok("late".to_string())
    }
}

#[async_trait]
impl TransactionConfirmer for Gated {
    async fn latest_reference(&self) -> Result<BlockReference, TransactionError> {
        Ok(BlockReference {
            blockhash: "hash".to_string(),
            last_valid_block_height: 0,
        })
    }

    async fn confirm(
        &self,
        _txid: &str,
        _reference: &BlockReference,
    ) -> Result<ConfirmationOutcome, TransactionError> {
        self.hold(Stage::Confirm).await;
        Ok(ConfirmationOutcome::Finalized)
    }
}

/// Log sink shared with a scoped subscriber
#[derive(Clone, Default)]
struct LogBuffer(Arc<parking_lot::Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Start `execute` on a gated network and wait until it blocks
async fn blocked_run(
    stage: Stage,
) -> (Arc<Gated>, Arc<TransactionTracker<()>>, tokio::task::JoinHandle<()>) {
    let gate = Gated::new(stage);
    let tracker = Arc::new(TransactionTracker::<()>::with_network(gate.clone()));

    let running = {
        let tracker = tracker.clone();
        tokio::spawn(async move { tracker.execute(()).await })
    };
    gate.entered.notified().await;

    (gate, tracker, running)
}

#[tokio::test]
async fn test_reset_mid_flight_discards_late_result() {
    let (gate, tracker, running) = blocked_run(Stage::Submit).await;
    assert_eq!(tracker.status(), TransactionStatus::Sending);

    tracker.reset();
    assert_eq!(tracker.status(), TransactionStatus::Idle);

    gate.release.notify_one();
    running.await.unwrap();

    assert_eq!(
        tracker.snapshot(),
        TrackerSnapshot::default(),
        "Writes from a reset run must be dropped"
    );
}

#[tokio::test]
async fn test_reset_while_confirming_discards_success() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (gate, tracker, running) = blocked_run(Stage::Confirm).await;
    assert_eq!(tracker.status(), TransactionStatus::Confirming);
    assert_eq!(tracker.txid().as_deref(), Some("late"));

    tracker.reset();
    assert_eq!(tracker.snapshot(), TrackerSnapshot::default());

    gate.release.notify_one();
    running.await.unwrap();

    assert_eq!(
        tracker.snapshot(),
        TrackerSnapshot::default(),
        "Success from a reset run must be dropped"
    );

    let output = logs.contents();
    assert!(
        !output.contains("Transaction confirmed"),
        "A reset run must not report success: {}",
        output
    );
    assert!(output.contains("Tracker was reset during execution"));
}

#[tokio::test]
async fn test_reset_from_idle() {
    let network = Observing::new(Ok("5xSig".into()), Ok(ConfirmationOutcome::Finalized));
    let tracker = observed_tracker(&network);

    tracker.reset();
    assert_eq!(tracker.snapshot(), TrackerSnapshot::default());

    tracker.execute(1).await;
    assert_eq!(
        tracker.status(),
        TransactionStatus::Success,
        "Reset from idle leaves the tracker usable"
    );
}

/// Network whose reference lookup fails after a successful submission
struct NoReference {
    confirm_calls: AtomicUsize,
}

#[async_trait]
impl TransactionSubmitter<()> for NoReference {
    async fn submit(&self, _payload: ()) -> Result<String, TransactionError> {
        Ok("5xSig".to_string())
    }
}

#[async_trait]
impl TransactionConfirmer for NoReference {
    async fn latest_reference(&self) -> Result<BlockReference, TransactionError> {
        Err(TransactionError::Confirmation(
            "Failed to get recent blockhash".to_string(),
        ))
    }

    async fn confirm(
        &self,
        _txid: &str,
        _reference: &BlockReference,
    ) -> Result<ConfirmationOutcome, TransactionError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ConfirmationOutcome::Finalized)
    }
}

#[tokio::test]
async fn test_reference_fault_is_confirmation_error() {
    let network = Arc::new(NoReference {
        confirm_calls: AtomicUsize::new(0),
    });
    let tracker = TransactionTracker::<()>::with_network(network.clone());

    tracker.execute(()).await;

    assert_eq!(
        tracker.snapshot(),
        TrackerSnapshot {
            status: TransactionStatus::Error,
            txid: Some("5xSig".into()),
            error: Some("Failed to get recent blockhash".into()),
        }
    );
    assert_eq!(network.confirm_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_subscribers_see_every_step() {
    let network = Observing::new(Ok("5xSig".into()), Ok(ConfirmationOutcome::Finalized));
    let tracker = observed_tracker(&network);
    let mut updates = tracker.subscribe();

    tracker.execute(1).await;

    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().status, TransactionStatus::Success);
}

#[tokio::test(start_paused = true)]
async fn test_simulated_network_success() {
    let network = Arc::new(SimulatedNetwork::new(
        Duration::from_secs(2),
        Duration::from_secs(4),
        0.0,
    ));
    let tracker = TransactionTracker::<()>::with_network(network);

    tracker.execute(()).await;

    assert_eq!(tracker.status(), TransactionStatus::Success);
    assert_eq!(tracker.txid().as_deref(), Some(SIMULATED_SIGNATURE));
    assert_eq!(tracker.error(), None);
}

#[tokio::test(start_paused = true)]
async fn test_simulated_network_failure() {
    let network = Arc::new(SimulatedNetwork::new(
        Duration::from_secs(2),
        Duration::from_secs(4),
        1.0,
    ));
    let tracker = TransactionTracker::<()>::with_network(network);

    tracker.execute(()).await;

    assert_eq!(tracker.status(), TransactionStatus::Error);
    assert_eq!(tracker.txid().as_deref(), Some(SIMULATED_SIGNATURE));
    assert_eq!(tracker.error().as_deref(), Some(SIMULATED_FAILURE));
}

#[tokio::test(start_paused = true)]
async fn test_simulated_network_timing() {
    let network = Arc::new(SimulatedNetwork::new(
        Duration::from_secs(2),
        Duration::from_secs(4),
        0.0,
    ));
    let tracker = Arc::new(TransactionTracker::<()>::with_network(network));

    let running = {
        let tracker = tracker.clone();
        tokio::spawn(async move { tracker.execute(()).await })
    };

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(tracker.status(), TransactionStatus::Sending);

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    assert_eq!(tracker.status(), TransactionStatus::Confirming);

    running.await.unwrap();
    assert_eq!(tracker.status(), TransactionStatus::Success);
}

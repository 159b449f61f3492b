use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ks_app::usecases::{AcquisitionError, AcquisitionOrchestrator, KeyFetcher, KeyVerifier};
use ks_core::ports::{
    KeyMaterialError, KeyMaterialPort, KeyRetrievalError, KeyRetrievalPort, MacPort,
    PeerRegistryPort,
};
use ks_core::{PeerCandidate, VerificationMethod};
use tokio::sync::mpsc;

const FPR: &str = "140162A978431A0258B3EC24E69EEE14181523F4";

#[tokio::test]
async fn acquisition_flow_test_second_peer_delivers_after_first_fails() {
    let registry = MockRegistry::with_peers(vec![peer("broken", FPR), peer("good", "OTHER")]);
    let retrieval = MockRetrieval::new(vec![
        ("broken", Err(KeyRetrievalError::ConnectionFailure("refused".into()))),
        ("good", Ok(key_bytes(FPR))),
    ]);
    let orchestrator = build(registry, retrieval.clone());

    let (outcomes, mut rx) = outcome_channel();
    let success = outcomes.clone();
    orchestrator
        .acquire(
            FPR.to_string(),
            None,
            move |fingerprint, key_data| {
                success
                    .send(Outcome::Success(fingerprint, key_data))
                    .unwrap();
            },
            move || outcomes.send(Outcome::Failure).unwrap(),
        )
        .await
        .expect("acquisition task");

    assert_eq!(rx.recv().await, Some(Outcome::Success(FPR.to_string(), key_bytes(FPR))));
    assert_eq!(rx.recv().await, None, "exactly one callback");
    assert_eq!(retrieval.contacted(), vec!["broken", "good"]);
}

#[tokio::test]
async fn acquisition_flow_test_reports_failure_once_when_no_peer_verifies() {
    let registry = MockRegistry::with_peers(vec![peer("a", FPR), peer("b", FPR)]);
    let retrieval = MockRetrieval::new(vec![
        ("a", Ok(key_bytes("SOMEONE-ELSE"))),
        ("b", Err(KeyRetrievalError::Timeout)),
    ]);
    let orchestrator = build(registry, retrieval);

    let (outcomes, mut rx) = outcome_channel();
    let success = outcomes.clone();
    orchestrator
        .acquire(
            FPR.to_string(),
            None,
            move |fingerprint, key_data| {
                success
                    .send(Outcome::Success(fingerprint, key_data))
                    .unwrap();
            },
            move || outcomes.send(Outcome::Failure).unwrap(),
        )
        .await
        .expect("acquisition task");

    assert_eq!(rx.recv().await, Some(Outcome::Failure));
    assert_eq!(rx.recv().await, None, "exactly one callback");
}

#[tokio::test]
async fn acquisition_flow_test_failure_counts_unreachable_peers() {
    let registry = MockRegistry::with_peers(vec![
        peer("refused", FPR),
        peer("slow", FPR),
        peer("impostor", FPR),
    ]);
    let retrieval = MockRetrieval::new(vec![
        ("refused", Err(KeyRetrievalError::ConnectionFailure("refused".into()))),
        ("slow", Err(KeyRetrievalError::Timeout)),
        ("impostor", Ok(key_bytes("SOMEONE-ELSE"))),
    ]);
    let orchestrator = build(registry, retrieval);

    let err = orchestrator.acquire_key(FPR, None).await.unwrap_err();

    assert_eq!(
        err,
        AcquisitionError::NoVerifiedKeyFound {
            fingerprint: FPR.to_string(),
            peers_contacted: 3,
            candidates_checked: 1,
        }
    );
    assert!(err.to_string().contains("3 contacted, 1 keys checked"));
}

#[tokio::test]
async fn acquisition_flow_test_stops_at_first_verified_key() {
    let registry = MockRegistry::with_peers(vec![peer("first", FPR), peer("second", FPR)]);
    let retrieval = MockRetrieval::new(vec![
        ("first", Ok(key_bytes(FPR))),
        ("second", Ok(key_bytes(FPR))),
    ]);
    let orchestrator = build(registry, retrieval.clone());

    let acquired = orchestrator
        .acquire_key(FPR, None)
        .await
        .expect("verified key");

    assert_eq!(acquired.peer.name, "first");
    assert_eq!(acquired.verification.method, VerificationMethod::FingerprintRecompute);
    assert_eq!(retrieval.contacted(), vec!["first"]);
}

#[tokio::test]
async fn acquisition_flow_test_advertising_peer_is_asked_first() {
    let registry = MockRegistry::with_peers(vec![peer("other", "OTHER"), peer("owner", FPR)]);
    let retrieval = MockRetrieval::new(vec![
        ("other", Ok(key_bytes("OTHER"))),
        ("owner", Ok(key_bytes(FPR))),
    ]);
    let orchestrator = build(registry, retrieval.clone());

    let acquired = orchestrator
        .acquire_key(FPR, None)
        .await
        .expect("verified key");

    assert_eq!(acquired.peer.name, "owner");
    assert_eq!(retrieval.contacted(), vec!["owner"]);
}

#[tokio::test]
async fn acquisition_flow_test_mac_accepts_key_regardless_of_declared_fingerprint() {
    let registry = MockRegistry::with_peers(vec![peer("owner", FPR)]);
    let retrieval = MockRetrieval::new(vec![("owner", Ok(b"opaque key".to_vec()))]);
    let orchestrator = build(registry, retrieval);

    let acquired = orchestrator
        .acquire_key(FPR, Some(GOOD_TAG))
        .await
        .expect("verified key");
    assert_eq!(acquired.verification.method, VerificationMethod::MacCheck);

    let rejected = orchestrator.acquire_key(FPR, Some("WRONG")).await;
    assert_eq!(
        rejected,
        Err(AcquisitionError::NoVerifiedKeyFound {
            fingerprint: FPR.to_string(),
            peers_contacted: 1,
            candidates_checked: 1,
        })
    );
}

#[tokio::test]
async fn acquisition_flow_test_registry_failure_means_no_peers() {
    let registry = MockRegistry::failing();
    let retrieval = MockRetrieval::new(vec![]);
    let orchestrator = build(registry, retrieval.clone());

    let result = orchestrator.acquire_key(FPR, None).await;

    assert_eq!(
        result,
        Err(AcquisitionError::NoVerifiedKeyFound {
            fingerprint: FPR.to_string(),
            peers_contacted: 0,
            candidates_checked: 0,
        })
    );
    assert!(retrieval.contacted().is_empty());
}

#[tokio::test]
async fn acquisition_flow_test_every_run_reads_the_registry_again() {
    let registry = MockRegistry::with_peers(vec![]);
    let retrieval = MockRetrieval::new(vec![("late", Ok(key_bytes(FPR)))]);
    let orchestrator = build(registry.clone(), retrieval);

    assert!(orchestrator.acquire_key(FPR, None).await.is_err());

    registry.set_peers(vec![peer("late", FPR)]);
    let acquired = orchestrator
        .acquire_key(FPR, None)
        .await
        .expect("peer appeared");

    assert_eq!(acquired.peer.name, "late");
    assert_eq!(registry.reads(), 2);
}

// -- helpers ---------------------------------------------------------------

const GOOD_TAG: &str = "GOODTAG";

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Success(String, Vec<u8>),
    Failure,
}

fn outcome_channel() -> (mpsc::UnboundedSender<Outcome>, mpsc::UnboundedReceiver<Outcome>) {
    mpsc::unbounded_channel()
}

fn peer(name: &str, fingerprint: &str) -> PeerCandidate {
    PeerCandidate::new(name, format!("{name}.local"), 9001, fingerprint)
}

/// Fake key material: "KEY:<fingerprint>".
fn key_bytes(fingerprint: &str) -> Vec<u8> {
    format!("KEY:{fingerprint}").into_bytes()
}

fn build(
    registry: Arc<MockRegistry>,
    retrieval: Arc<MockRetrieval>,
) -> Arc<AcquisitionOrchestrator> {
    let fetcher = KeyFetcher::new(retrieval, Duration::from_secs(5));
    let verifier = KeyVerifier::new(Arc::new(MockMac), Arc::new(MockKeyMaterial));
    Arc::new(AcquisitionOrchestrator::new(registry, fetcher, verifier))
}

struct MockRegistry {
    peers: Mutex<Option<Vec<PeerCandidate>>>,
    reads: AtomicUsize,
}

impl MockRegistry {
    fn with_peers(peers: Vec<PeerCandidate>) -> Arc<Self> {
        Arc::new(Self {
            peers: Mutex::new(Some(peers)),
            reads: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            peers: Mutex::new(None),
            reads: AtomicUsize::new(0),
        })
    }

    fn set_peers(&self, peers: Vec<PeerCandidate>) {
        *self.peers.lock().unwrap() = Some(peers);
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PeerRegistryPort for MockRegistry {
    async fn list_peers(&self) -> anyhow::Result<Vec<PeerCandidate>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.peers
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("discovery unavailable"))
    }
}

struct MockRetrieval {
    responses: HashMap<String, Result<Vec<u8>, KeyRetrievalError>>,
    contacted: Mutex<Vec<String>>,
}

impl MockRetrieval {
    fn new(responses: Vec<(&str, Result<Vec<u8>, KeyRetrievalError>)>) -> Arc<Self> {
        Arc::new(Self {
            responses: responses
                .into_iter()
                .map(|(name, result)| (name.to_string(), result))
                .collect(),
            contacted: Mutex::new(Vec::new()),
        })
    }

    fn contacted(&self) -> Vec<String> {
        self.contacted.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyRetrievalPort for MockRetrieval {
    async fn fetch_key(
        &self,
        peer: &PeerCandidate,
        _timeout: Duration,
    ) -> Result<Vec<u8>, KeyRetrievalError> {
        self.contacted.lock().unwrap().push(peer.name.clone());
        self.responses
            .get(&peer.name)
            .cloned()
            .unwrap_or_else(|| Err(KeyRetrievalError::ConnectionFailure("unknown peer".into())))
    }
}

struct MockMac;

impl MacPort for MockMac {
    fn verify(&self, _fingerprint: &str, _data: &[u8], tag: &str) -> bool {
        tag == GOOD_TAG
    }
}

struct MockKeyMaterial;

impl KeyMaterialPort for MockKeyMaterial {
    fn fingerprint_from_keydata(&self, key_data: &[u8]) -> Result<String, KeyMaterialError> {
        std::str::from_utf8(key_data)
            .ok()
            .and_then(|text| text.strip_prefix("KEY:"))
            .map(str::to_string)
            .ok_or_else(|| KeyMaterialError::Unparseable("not a key".into()))
    }

    fn is_well_formed(&self, key_data: &[u8]) -> bool {
        self.fingerprint_from_keydata(key_data).is_ok()
    }
}

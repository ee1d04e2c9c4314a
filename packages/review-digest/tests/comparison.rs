//! Integration tests for comparisons and quota charging.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use review_digest::{
    testing::{reviews_of_increasing_length, MockBackend, MockCatalog, MockMirror},
    AnalysisCache, AnalysisArchive, AnalysisRecord, CatalogListing, ComparisonCoordinator, ComparisonSessions,
    DigestConfig, DigestError, DigestPipeline, DigestService, GenerationBackend, MemoryLedger,
    QuotaLedger, RawReview, SessionStep, UserId, ANALYSIS_FAILED_MESSAGE,
};

const KETTLE: &str = "1111111";
const TOASTER: &str = "2222222";
const SILENT: &str = "3333333";
const USER: i64 = 42;

struct Setup {
    backend: Arc<MockBackend>,
    pipeline: Arc<DigestPipeline>,
}

fn setup(backend: MockBackend) -> Setup {
    let catalog = MockCatalog::new()
        .with_product(KETTLE, "Kettle", 10)
        .with_product(TOASTER, "Toaster", 20)
        .with_product(SILENT, "Silent fan", 30);
    let primary = MockMirror::new("primary")
        .with_reviews(10, reviews_of_increasing_length(KETTLE, 5))
        .with_reviews(20, vec![RawReview::new("Browns evenly", TOASTER)])
        .with_reviews(30, vec![RawReview::new("Review for another colour", "3333334")]);

    let backend = Arc::new(backend);
    let pipeline = Arc::new(DigestPipeline::assemble(
        &DigestConfig::default().with_backend_timeout(Duration::from_millis(100)),
        Arc::new(catalog),
        Arc::new(primary),
        Arc::new(MockMirror::new("secondary")),
        vec![backend.clone() as Arc<dyn GenerationBackend>],
        Arc::new(AnalysisCache::default()),
    ));

    Setup { backend, pipeline }
}

fn service(pipeline: Arc<DigestPipeline>, ledger: Arc<MemoryLedger>) -> DigestService {
    let catalog = Arc::new(MockCatalog::new().with_listings(vec![CatalogListing {
        id: 1,
        name: "Kettle".into(),
        price: 1299.0,
        rating: 4.7,
        feedback_count: 10,
    }]));
    DigestService::new(pipeline, catalog, ledger.clone(), ledger, 10)
}

/// Archive whose writes always fail.
struct BrokenArchive;

#[async_trait]
impl AnalysisArchive for BrokenArchive {
    async fn save_analysis(&self, _: UserId, _: &str, _: &str, _: &str) -> review_digest::error::Result<()> {
        Err(DigestError::Ledger("archive offline".into()))
    }

    async fn last_analysis(&self, _: UserId) -> review_digest::error::Result<Option<AnalysisRecord>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_compare_renders_both_products() {
    let s = setup(MockBackend::responding("gpt-4", "✅ PROS:\n- good"));
    let coordinator = ComparisonCoordinator::new(s.pipeline.clone());

    let report = coordinator.compare(KETTLE, TOASTER).await.unwrap();

    assert_eq!(report.first.product.display_name, "Kettle");
    assert_eq!(report.second.product.display_name, "Toaster");
    let text = report.render();
    assert!(text.contains("Kettle (article 1111111)"));
    assert!(text.contains("Toaster (article 2222222)"));
    assert_eq!(s.backend.call_count(), 2);
}

#[tokio::test]
async fn test_compare_with_empty_side_runs_no_analysis() {
    let s = setup(MockBackend::responding("gpt-4", "✅ PROS:\n- good"));
    let coordinator = ComparisonCoordinator::new(s.pipeline.clone());

    let err = coordinator.compare(KETTLE, SILENT).await.unwrap_err();

    assert!(matches!(err, DigestError::EmptyReviewSet { ref sku } if sku == SILENT));
    assert_eq!(s.backend.call_count(), 0);
}

#[tokio::test]
async fn test_compare_charges_two_attempts() {
    let s = setup(MockBackend::responding("gpt-4", "✅ PROS:\n- good"));
    let ledger = Arc::new(MemoryLedger::new(3));
    let svc = service(s.pipeline, ledger.clone());

    let charged = svc.compare_for_user(USER, KETTLE, TOASTER).await.unwrap();

    assert_eq!(charged.remaining_attempts, 1);
    assert_eq!(ledger.attempts(USER).await.unwrap(), 1);
}

#[tokio::test]
async fn test_compare_with_empty_side_charges_nothing() {
    let s = setup(MockBackend::responding("gpt-4", "✅ PROS:\n- good"));
    let ledger = Arc::new(MemoryLedger::new(3));
    let svc = service(s.pipeline, ledger.clone());

    let err = svc.compare_for_user(USER, SILENT, KETTLE).await.unwrap_err();

    assert!(matches!(err, DigestError::EmptyReviewSet { .. }));
    assert_eq!(ledger.attempts(USER).await.unwrap(), 3);
}

#[tokio::test]
async fn test_compare_needs_two_attempts() {
    let s = setup(MockBackend::responding("gpt-4", "ok"));
    let ledger = Arc::new(MemoryLedger::new(1));
    let svc = service(s.pipeline, ledger);

    let err = svc.compare_for_user(USER, KETTLE, TOASTER).await.unwrap_err();

    assert!(matches!(
        err,
        DigestError::InsufficientAttempts {
            required: 2,
            available: 1
        }
    ));
    assert_eq!(s.backend.call_count(), 0);
}

#[tokio::test]
async fn test_analysis_charges_and_archives() {
    let s = setup(MockBackend::responding("gpt-4", "✅ PROS:\n- boils fast"));
    let ledger = Arc::new(MemoryLedger::new(3));
    let svc = service(s.pipeline, ledger.clone());

    let charged = svc.analyze_for_user(USER, KETTLE).await.unwrap();

    assert_eq!(charged.remaining_attempts, 2);
    let last = ledger.last_analysis(USER).await.unwrap().unwrap();
    assert_eq!(last.sku, KETTLE);
    assert_eq!(last.product_name, "Kettle");
    assert_eq!(last.text, charged.digest.analysis.text);
    assert_eq!(svc.last_analysis(USER).await.unwrap(), Some(last));
}

#[tokio::test]
async fn test_archive_failure_still_returns_charged_digest() {
    let s = setup(MockBackend::responding("gpt-4", "✅ PROS:\n- boils fast"));
    let ledger = Arc::new(MemoryLedger::new(3));
    let catalog = Arc::new(MockCatalog::new());
    let svc = DigestService::new(s.pipeline, catalog, ledger.clone(), Arc::new(BrokenArchive), 10);

    let charged = svc.analyze_for_user(USER, KETTLE).await.unwrap();

    assert_eq!(charged.remaining_attempts, 2);
    assert_eq!(charged.digest.analysis.text, "✅ PROS:\n- boils fast");
    assert_eq!(ledger.attempts(USER).await.unwrap(), 2);
}

#[tokio::test]
async fn test_exhausted_backends_still_return_text() {
    let s = setup(MockBackend::hanging("gpt-4"));
    let ledger = Arc::new(MemoryLedger::new(3));
    let svc = service(s.pipeline, ledger);

    let charged = svc.analyze_for_user(USER, TOASTER).await.unwrap();

    assert_eq!(charged.digest.analysis.text, ANALYSIS_FAILED_MESSAGE);
    assert!(charged.digest.analysis.backend.is_none());
}

#[tokio::test]
async fn test_no_attempts_blocks_analysis() {
    let s = setup(MockBackend::responding("gpt-4", "ok"));
    let ledger = Arc::new(MemoryLedger::new(0));
    let svc = service(s.pipeline, ledger);

    assert!(matches!(
        svc.analyze_for_user(USER, KETTLE).await,
        Err(DigestError::InsufficientAttempts { .. })
    ));
}

#[tokio::test]
async fn test_search_respects_limit_and_rejects_blank() {
    let s = setup(MockBackend::responding("gpt-4", "ok"));
    let svc = service(s.pipeline, Arc::new(MemoryLedger::default()));

    assert_eq!(svc.search("kettle").await.unwrap().len(), 1);
    assert!(matches!(svc.search("  ").await, Err(DigestError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_session_feeds_comparison() {
    let s = setup(MockBackend::responding("gpt-4", "ok"));
    let ledger = Arc::new(MemoryLedger::new(2));
    let svc = service(s.pipeline, ledger);
    let sessions = ComparisonSessions::new(Duration::from_secs(600), vec!["wildberries".into()]);

    sessions.begin(USER);
    assert_eq!(sessions.submit(USER, KETTLE).unwrap(), SessionStep::NeedSecond);
    let SessionStep::Ready { first, second } = sessions.submit(USER, TOASTER).unwrap() else {
        panic!("expected both products");
    };

    let charged = svc.compare_for_user(USER, &first, &second).await.unwrap();
    assert_eq!(charged.remaining_attempts, 0);
}

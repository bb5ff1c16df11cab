//! Runs the backend-agnostic conformance suite against SQLite.

use duel_storage::conformance::run_conformance_suite;
use duel_storage::SqliteSimulationStore;

#[tokio::test]
async fn sqlite_in_memory_conformance() {
    let report = run_conformance_suite(|| async {
        SqliteSimulationStore::in_memory()
            .await
            .expect("in-memory sqlite")
    })
    .await;
    assert!(report.total > 0);
    assert!(report.failed == 0, "{report}");
}

#[tokio::test]
async fn sqlite_file_conformance() {
    let dir = tempfile::tempdir().expect("tempdir");
    let counter = std::sync::atomic::AtomicUsize::new(0);
    let report = run_conformance_suite(|| {
        let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join(format!("sim-{n}.db")).display()
        );
        async move {
            SqliteSimulationStore::connect(&url)
                .await
                .expect("file sqlite")
        }
    })
    .await;
    assert!(report.failed == 0, "{report}");
}

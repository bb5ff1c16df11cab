use std::future::Future;
use std::sync::Arc;

use super::{make_simulation, TestResult};
use crate::{SimulationStore, StorageError};

/// Number of concurrent tasks to spawn in each test.
const N: usize = 10;

pub(super) async fn run_concurrent_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "concurrent",
            "concurrent_inserts_same_id_exactly_one_wins",
            concurrent_inserts_same_id_exactly_one_wins(factory).await,
        ),
        TestResult::from_result(
            "concurrent",
            "concurrent_inserts_distinct_ids_all_succeed",
            concurrent_inserts_distinct_ids_all_succeed(factory).await,
        ),
    ]
}

// ── Concurrent insert: exactly one wins ─────────────────────────────────────

/// N tasks race to insert the same id. Exactly one insert succeeds; the rest
/// must get AlreadyExists.
async fn concurrent_inserts_same_id_exactly_one_wins<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);

    let mut handles = Vec::new();
    for i in 0..N {
        let s = storage.clone();
        handles.push(tokio::spawn(async move {
            let mut rec = make_simulation("sim-race");
            rec.summary = format!("writer-{i}");
            match s.insert_simulation(rec).await {
                Ok(()) => Ok(true),
                Err(StorageError::AlreadyExists { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        }));
    }

    let mut winners = 0usize;
    let mut losers = 0usize;
    for handle in handles {
        let won = handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e: StorageError| format!("storage error: {e}"))?;
        if won {
            winners += 1;
        } else {
            losers += 1;
        }
    }

    if winners != 1 {
        return Err(format!("expected exactly 1 winner, got {winners}"));
    }
    if losers != N - 1 {
        return Err(format!("expected {} losers, got {losers}", N - 1));
    }
    Ok(())
}

// ── Concurrent insert: independent ids ──────────────────────────────────────

async fn concurrent_inserts_distinct_ids_all_succeed<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);

    let mut handles = Vec::new();
    for i in 0..N {
        let s = storage.clone();
        handles.push(tokio::spawn(async move {
            s.insert_simulation(make_simulation(&format!("sim-{i}")))
                .await
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e| format!("storage error: {e}"))?;
    }

    for i in 0..N {
        let id = format!("sim-{i}");
        if storage
            .get_simulation(&id)
            .await
            .map_err(|e| e.to_string())?
            .is_none()
        {
            return Err(format!("{id} missing after concurrent insert"));
        }
    }
    Ok(())
}

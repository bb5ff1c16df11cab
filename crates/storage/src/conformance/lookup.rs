use std::future::Future;

use super::{make_simulation, TestResult};
use crate::SimulationStore;

pub(super) async fn run_lookup_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "lookup",
            "unknown_id_returns_none",
            unknown_id_returns_none(factory).await,
        ),
        TestResult::from_result(
            "lookup",
            "lookup_is_exact_match",
            lookup_is_exact_match(factory).await,
        ),
        TestResult::from_result(
            "lookup",
            "empty_id_is_an_ordinary_key",
            empty_id_is_an_ordinary_key(factory).await,
        ),
    ]
}

async fn unknown_id_returns_none<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.get_simulation("missing").await {
        Ok(None) => Ok(()),
        Ok(Some(rec)) => Err(format!("expected None, got {rec:?}")),
        Err(e) => Err(format!("expected None, got error {e}")),
    }
}

/// No prefix, case-folding or wildcard matching.
async fn lookup_is_exact_match<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert_simulation(make_simulation("Sim-1"))
        .await
        .map_err(|e| e.to_string())?;

    for probe in ["sim-1", "Sim-", "Sim-1 ", "%", "Sim-_"] {
        if s
            .get_simulation(probe)
            .await
            .map_err(|e| e.to_string())?
            .is_some()
        {
            return Err(format!("probe {probe:?} unexpectedly matched \"Sim-1\""));
        }
    }
    if s
        .get_simulation("Sim-1")
        .await
        .map_err(|e| e.to_string())?
        .is_none()
    {
        return Err("exact id did not match".to_string());
    }
    Ok(())
}

async fn empty_id_is_an_ordinary_key<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    if s
        .get_simulation("")
        .await
        .map_err(|e| e.to_string())?
        .is_some()
    {
        return Err("empty id matched on an empty store".to_string());
    }
    s.insert_simulation(make_simulation(""))
        .await
        .map_err(|e| e.to_string())?;
    if s
        .get_simulation("")
        .await
        .map_err(|e| e.to_string())?
        .is_none()
    {
        return Err("record with empty id not found".to_string());
    }
    Ok(())
}

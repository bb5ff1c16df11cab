use std::future::Future;

use super::{make_simulation, TestResult};
use crate::{SimulationStore, StorageError};

pub(super) async fn run_insert_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "insert",
            "inserted_record_round_trips",
            inserted_record_round_trips(factory).await,
        ),
        TestResult::from_result(
            "insert",
            "created_at_is_assigned",
            created_at_is_assigned(factory).await,
        ),
        TestResult::from_result(
            "insert",
            "data_key_order_is_preserved",
            data_key_order_is_preserved(factory).await,
        ),
        TestResult::from_result(
            "insert",
            "duplicate_id_returns_already_exists",
            duplicate_id_returns_already_exists(factory).await,
        ),
        TestResult::from_result(
            "insert",
            "duplicate_insert_keeps_original_row",
            duplicate_insert_keeps_original_row(factory).await,
        ),
        TestResult::from_result(
            "insert",
            "non_object_data_is_stored",
            non_object_data_is_stored(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

/// Every field written by insert comes back unchanged.
async fn inserted_record_round_trips<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let new = make_simulation("sim-1");
    s.insert_simulation(new.clone())
        .await
        .map_err(|e| e.to_string())?;

    let rec = s
        .get_simulation("sim-1")
        .await
        .map_err(|e| e.to_string())?
        .ok_or("inserted record not found")?;

    if rec.id != new.id
        || rec.user_id != new.user_id
        || rec.env_id != new.env_id
        || rec.data_hash != new.data_hash
        || rec.data != new.data
        || rec.result != new.result
        || rec.summary != new.summary
    {
        return Err(format!("round trip mismatch: wrote {new:?}, read {rec:?}"));
    }
    Ok(())
}

async fn created_at_is_assigned<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert_simulation(make_simulation("sim-1"))
        .await
        .map_err(|e| e.to_string())?;

    let rec = s
        .get_simulation("sim-1")
        .await
        .map_err(|e| e.to_string())?
        .ok_or("inserted record not found")?;
    if rec.created_at.trim().is_empty() {
        return Err("created_at is empty".to_string());
    }
    Ok(())
}

/// Stored payloads keep their object key order so the hash stays reproducible.
async fn data_key_order_is_preserved<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let raw = r#"{"zeta":1,"alpha":{"y":2,"b":[3,4]},"mid":null}"#;
    let mut new = make_simulation("sim-1");
    new.data = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    s.insert_simulation(new).await.map_err(|e| e.to_string())?;

    let rec = s
        .get_simulation("sim-1")
        .await
        .map_err(|e| e.to_string())?
        .ok_or("inserted record not found")?;
    let read = rec.data.to_string();
    if read != raw {
        return Err(format!("expected {raw}, got {read}"));
    }
    Ok(())
}

async fn duplicate_id_returns_already_exists<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert_simulation(make_simulation("sim-1"))
        .await
        .map_err(|e| e.to_string())?;

    match s.insert_simulation(make_simulation("sim-1")).await {
        Err(StorageError::AlreadyExists { id }) if id == "sim-1" => Ok(()),
        Err(StorageError::AlreadyExists { id }) => {
            Err(format!("AlreadyExists carried wrong id: {id}"))
        }
        Err(e) => Err(format!("expected AlreadyExists, got {e}")),
        Ok(()) => Err("duplicate insert succeeded".to_string()),
    }
}

async fn duplicate_insert_keeps_original_row<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert_simulation(make_simulation("sim-1"))
        .await
        .map_err(|e| e.to_string())?;

    let mut second = make_simulation("sim-1");
    second.summary = "overwritten".to_string();
    let _ = s.insert_simulation(second).await;

    let rec = s
        .get_simulation("sim-1")
        .await
        .map_err(|e| e.to_string())?
        .ok_or("original record vanished")?;
    if rec.summary != "ok" {
        return Err(format!("expected original summary \"ok\", got {:?}", rec.summary));
    }
    Ok(())
}

/// `data` is any JSON value, not only objects.
async fn non_object_data_is_stored<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: SimulationStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    for (i, data) in [
        serde_json::json!(null),
        serde_json::json!([1, "two"]),
        serde_json::json!("plain"),
        serde_json::json!(42),
    ]
    .into_iter()
    .enumerate()
    {
        let id = format!("sim-{i}");
        let mut new = make_simulation(&id);
        new.data = data.clone();
        s.insert_simulation(new).await.map_err(|e| e.to_string())?;

        let rec = s
            .get_simulation(&id)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("{id} not found"))?;
        if rec.data != data {
            return Err(format!("{id}: expected {data}, got {}", rec.data));
        }
    }
    Ok(())
}

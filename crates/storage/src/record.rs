use serde::{Deserialize, Serialize};

/// A simulation ready to be inserted. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSimulation {
    pub id: String,
    pub user_id: String,
    pub env_id: String,
    /// Hex SHA-256 of the compact serialization of `data`.
    pub data_hash: String,
    pub data: serde_json::Value,
    pub result: f64,
    pub summary: String,
}

/// A stored simulation row, serialized in table column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id: String,
    pub user_id: String,
    pub env_id: String,
    pub data_hash: String,
    pub data: serde_json::Value,
    pub result: f64,
    pub summary: String,
    /// Store-formatted insert timestamp (`YYYY-MM-DD HH:MM:SS`, UTC, for SQLite).
    pub created_at: String,
}

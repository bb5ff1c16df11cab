use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{NewSimulation, SimulationRecord};

/// The storage trait for simulation records.
///
/// Records are written once and never updated. Each method performs exactly
/// one statement against the backend; isolation between concurrent writers
/// is the backend's responsibility.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` to be used in axum
/// application state and across async task boundaries.
#[async_trait]
pub trait SimulationStore: Send + Sync + 'static {
    /// Insert a new simulation, stamping `created_at` with the store's clock.
    ///
    /// Returns `Err(StorageError::AlreadyExists)` if the id is taken.
    async fn insert_simulation(&self, record: NewSimulation) -> Result<(), StorageError>;

    /// Fetch the simulation with the given id, if any.
    async fn get_simulation(&self, id: &str) -> Result<Option<SimulationRecord>, StorageError>;
}

/// All errors that can be returned by a SimulationStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A simulation with this id is already stored (primary-key collision).
    #[error("simulation already exists: {id}")]
    AlreadyExists { id: String },

    /// A backend-specific storage error (DB connection, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub mod conformance;
mod error;
mod record;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;

pub use error::StorageError;
pub use record::{NewSimulation, SimulationRecord};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSimulationStore;
pub use traits::SimulationStore;

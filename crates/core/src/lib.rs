//! duel-core: the pure half of the simulation API.
//!
//! Turns an untrusted JSON request body into a typed
//! [`SimulationSubmission`] and computes the content hash stored alongside
//! the payload. Nothing in this crate performs I/O.
//!
//! # Public API
//!
//! - [`validate_submission()`] -- check a body against [`SIMULATION_SCHEMA`]
//! - [`content_hash()`] -- hex SHA-256 of the `JSON.stringify` rendering
//! - [`js_json`] -- serde_json output with ECMAScript number formatting
//! - [`ValidationError`] -- the 400-class failures of a submission

pub mod error;
pub mod hash;
pub mod js_json;
pub mod schema;

pub use error::ValidationError;
pub use hash::content_hash;
pub use schema::{
    validate_submission, FieldSpec, FieldType, SimulationSubmission, SIMULATION_SCHEMA,
};

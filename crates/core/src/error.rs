/// Reasons a simulation submission is rejected before it reaches the store.
///
/// The `Display` strings are returned verbatim to the caller in the
/// `message` field of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The body parsed as JSON but is `null` or a scalar. Arrays get
    /// [`ValidationError::MissingField`] for the first schema field instead.
    #[error("Invalid data structure")]
    InvalidStructure,

    /// A schema field is absent from the body.
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// A schema field is present with the wrong JSON type.
    ///
    /// Names the single offending field (`"env_id must be a string"`). Older
    /// deployments answered every identifier type error with the combined
    /// text `"sim_id, user_id, and env_id must be strings"`; callers matching
    /// on that string should match on the `must be` suffix instead.
    #[error("{field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

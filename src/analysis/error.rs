//! Defines the error types for structural validation.

/// The specific category of a validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorType {
    /// A transfo or transfo tree id that does not exist in the snapshot.
    MissingReference,
    /// Two transfos join the same (source, target) pair.
    ParallelEdges,
    /// The edge set is disconnected or holds a cycle.
    NotATree,
    /// A sensor connection tree that is not a single cross-sensor transfo.
    SensorConnection,
}

/// A structured error report for a rejected transfo tree or platform config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the tree or config being validated.
    pub subject: String,
    pub error_type: ValidationErrorType,
    pub message: String,
}

impl ValidationError {
    pub fn new(subject: &str, error_type: ValidationErrorType, message: String) -> Self {
        Self { subject: subject.to_string(), error_type, message }
    }
}

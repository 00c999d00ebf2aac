//! Error handling for the wrapper-description engine.
//!
//! Schema problems are split into two fatal categories: malformed input
//! (the schema itself breaks an invariant, e.g. two padding fields) and
//! resolution failures (a type node that cannot be mapped to any
//! serialization strategy). Both abort the render of the affected entity
//! with a message naming the entity and field; there is no permissive
//! fallback, since a descriptor built from a guessed layout would encode
//! incorrectly at runtime.
//!
//! The third category, [`CodegenError::OptionalAccountConfig`], is not a
//! generation-time error at all: it is surfaced by the key-list plan's
//! reference evaluator and belongs to the consumer of the generated
//! wrapper, who supplied optional accounts in an unsatisfiable order.

use thiserror::Error;

/// Main error type for wrapper-description rendering.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// The schema violates a structural invariant (unresolvable type
    /// reference, duplicate padding field, padding of the wrong element
    /// type, account bound to a non-struct type, ...).
    #[error("malformed schema: {0}")]
    MalformedSchema(String),

    /// A type node could not be mapped to a serialization strategy.
    #[error("type resolution error: {0}")]
    Resolution(String),

    /// Caller-supplied account values violate the plan's presence rules.
    /// Raised when evaluating a key-list plan, never while building one.
    #[error("account configuration error: {0}")]
    OptionalAccountConfig(String),
}

/// Result type alias for the wrapper-description engine.
pub type CodegenResult<T> = Result<T, CodegenError>;

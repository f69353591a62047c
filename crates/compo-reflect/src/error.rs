//! Type reference errors

use thiserror::Error;

/// Broad classification of a [`TypeRefError`]
///
/// Neither class is retryable: every failure is deterministic for the
/// same inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The call itself was malformed (missing or uninitialized input)
    InvalidArgument,
    /// The receiver is in the wrong state for the requested operation
    InvalidOperation,
}

/// Errors that can occur when building or specializing a type reference
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeRefError {
    /// No module identity was supplied
    #[error("Invalid argument: module identity is required")]
    MissingModuleIdentity,

    /// The generic argument sequence was never initialized
    #[error("Invalid argument: generic type arguments not initialized")]
    UninitializedGenericArguments,

    /// Raw construction with a partially bound argument list
    #[error("Invalid argument: expected 0 or {expected} generic type arguments, got {actual}")]
    GenericArgumentCount {
        /// Declared generic arity
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
    },

    /// Attempt to close a reference that is not an open generic definition
    #[error("Invalid operation: {type_ref} is not a generic type definition")]
    NotGenericDefinition {
        /// Display form of the receiver
        type_ref: String,
    },

    /// Attempt to close a generic definition with the wrong number of arguments
    #[error("Invalid operation: generic definition takes {expected} type arguments, got {actual}")]
    GenericArityMismatch {
        /// Declared generic arity
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
    },
}

impl TypeRefError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TypeRefError::MissingModuleIdentity
            | TypeRefError::UninitializedGenericArguments
            | TypeRefError::GenericArgumentCount { .. } => ErrorKind::InvalidArgument,
            TypeRefError::NotGenericDefinition { .. }
            | TypeRefError::GenericArityMismatch { .. } => ErrorKind::InvalidOperation,
        }
    }
}

/// Result alias for type reference operations
pub type Result<T> = std::result::Result<T, TypeRefError>;

//! Diagnostic error types for plankb.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. Expected domain outcomes
//! (missing key, duplicate key, invalid signature) are reported as
//! `Ok(false)` / `Ok(None)` by the DAOs — errors here cover storage faults
//! and structurally broken data only.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for plankb.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum KbError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("cyclic type hierarchy: father chain of \"{type_name}\" revisits itself")]
    #[diagnostic(
        code(plankb::model::cyclic_hierarchy),
        help(
            "Type father chains must terminate in a root type with no father. \
             A chain that revisits a type name cannot be materialized; fix the \
             father link of the offending type."
        )
    )]
    CyclicTypeHierarchy { type_name: String },
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error: {source}")]
    #[diagnostic(
        code(plankb::store::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("redb transaction error: {message}")]
    #[diagnostic(
        code(plankb::store::redb),
        help(
            "The embedded database encountered a transaction error. \
             This may indicate corruption — try running with a fresh data directory."
        )
    )]
    Redb { message: String },

    #[error("record serialization error: {message}")]
    #[diagnostic(
        code(plankb::store::serde),
        help(
            "Failed to serialize or deserialize a stored record. This usually \
             means the stored data was edited out of band or written by an \
             incompatible version."
        )
    )]
    Serialization { message: String },
}

/// Convenience alias for functions returning plankb results.
pub type KbResult<T> = std::result::Result<T, KbError>;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

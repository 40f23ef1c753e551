//! # Store Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (checkout planning, validation)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds lookup misses and duplicates          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (register app) ← Serialized for the front-end                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use till_core::{CoreError, ValidationError};

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in its table.
    ///
    /// ## When This Occurs
    /// - `update` on a product id that was never added
    /// - Transaction id lookup with no match
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A field that must be unique already exists.
    ///
    /// ## When This Occurs
    /// - Adding a product whose barcode is already on another product
    /// - Adding a customer with an email already on file
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Business rule failure (checkout rejections, validation).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

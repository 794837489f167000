//! Error types for transform and Euler-angle calculations.
//!
//! This module provides a unified error type [`GeomError`] covering the
//! failure modes of the geometric core: unrecognized rotation conventions,
//! invalid parameters, and numerical breakdown.
//!
//! # Error Categories
//!
//! | Variant | Use Case |
//! |---------|----------|
//! | [`InvalidConvention`](GeomError::InvalidConvention) | Unrecognized Euler/rotation convention name |
//! | [`InvalidParameter`](GeomError::InvalidParameter) | Out-of-domain or ill-typed parameter |
//! | [`Numeric`](GeomError::Numeric) | Singular matrix, zero scale, zero-length direction |
//!
//! # Usage
//!
//! Most fallible functions return [`GeomResult<T>`], which is
//! `Result<T, GeomError>`. Use the constructor methods for consistent error
//! creation:
//!
//! ```
//! use cryoem_core::{GeomError, GeomResult};
//!
//! fn reciprocal(x: f64) -> GeomResult<f64> {
//!     if x == 0.0 {
//!         return Err(GeomError::numeric("reciprocal", "input is zero"));
//!     }
//!     Ok(1.0 / x)
//! }
//! ```

use thiserror::Error;

/// Unified error type for the geometric core.
///
/// Covers convention lookup, parameter validation, and numerical failures.
/// Use the constructor methods ([`invalid_convention`](Self::invalid_convention),
/// [`invalid_parameter`](Self::invalid_parameter), [`numeric`](Self::numeric))
/// for consistent error creation.
#[derive(Error, Debug)]
pub enum GeomError {
    /// A rotation convention name that is not one of the supported set.
    #[error("Unknown rotation convention {name:?}")]
    InvalidConvention { name: String },

    /// A parameter outside its valid domain, or of the wrong type.
    #[error("Invalid parameter for {context}: {message}")]
    InvalidParameter { context: String, message: String },

    /// Numerical computation failure.
    #[error("Numeric error in {operation}: {message}")]
    Numeric { operation: String, message: String },
}

/// Convenience alias for `Result<T, GeomError>`.
pub type GeomResult<T> = Result<T, GeomError>;

impl GeomError {
    /// Creates an [`InvalidConvention`](Self::InvalidConvention) error.
    pub fn invalid_convention(name: impl Into<String>) -> Self {
        Self::InvalidConvention { name: name.into() }
    }

    /// Creates an [`InvalidParameter`](Self::InvalidParameter) error.
    pub fn invalid_parameter(context: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            context: context.to_string(),
            message: message.into(),
        }
    }

    /// Creates a [`Numeric`](Self::Numeric) error.
    pub fn numeric(operation: &str, message: impl Into<String>) -> Self {
        Self::Numeric {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

use cryoem_core::GeomError;
use thiserror::Error;

pub type SymmetryResult<T> = Result<T, SymmetryError>;

#[derive(Debug, Error)]
pub enum SymmetryError {
    #[error("Unknown symmetry {name:?}")]
    UnknownSymmetry { name: String },

    #[error("Invalid parameter for {context}: {message}")]
    InvalidParameter { context: String, message: String },

    #[error("Numeric error in {operation}: {message}")]
    Numeric { operation: String, message: String },

    #[error("Geometric core failure: {source}")]
    Core {
        #[from]
        source: GeomError,
    },
}

impl SymmetryError {
    pub fn unknown_symmetry(name: impl Into<String>) -> Self {
        Self::UnknownSymmetry { name: name.into() }
    }

    pub fn invalid_parameter(context: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            context: context.to_string(),
            message: message.into(),
        }
    }

    pub fn numeric(operation: &str, message: impl Into<String>) -> Self {
        Self::Numeric {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

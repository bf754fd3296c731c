use thiserror::Error;

/// Errors raised while describing types or resolving columns against them.
///
/// Unmapped columns are never reported here; resolvers return `None` for them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    #[error("unknown type: {0}")]
    UnknownType(String),
}

impl MapError {
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;

use std::result;
use thiserror::Error;

/// Root causes of a failed synthesis run.
///
/// Each one is a static property of the type graph, so the same input always fails
/// the same way.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeErrorKind {
    #[error("unsupported type")]
    UnsupportedType,
    #[error("use of unexported type from another package")]
    UnexportedType,
    #[error("use of imported type with an unexported field")]
    UnsettableField,
    #[error("type graph contains a cycle")]
    CyclicType,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{message}: {kind}")]
    Type {
        #[source]
        kind: TypeErrorKind,
        message: String,
    },
    #[error("Descriptor error: {0}")]
    Descriptor(String),
    #[error("Generic error: {0}")]
    Generic(String),
}

impl Error {
    pub fn type_error(kind: TypeErrorKind, message: impl Into<String>) -> Self {
        Error::Type {
            kind,
            message: message.into(),
        }
    }

    pub fn descriptor(message: impl Into<String>) -> Self {
        Error::Descriptor(message.into())
    }

    /// The underlying shape error, if this is one.
    pub fn cause(&self) -> Option<TypeErrorKind> {
        match self {
            Error::Type { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is(&self, kind: TypeErrorKind) -> bool {
        self.cause() == Some(kind)
    }
}

pub type Result<T> = result::Result<T, Error>;

// Convert from std::io::Error to our Error type
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}

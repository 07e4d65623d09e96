//! Type descriptor model shared by the deepcopy generators.

#[macro_use]
pub mod macros;

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items for convenience
pub use tracing;

pub use config::{RootNilPolicy, SynthesisOptions};
pub use types::{TypeArena, TypeDescriptor, TypeDocument, TypeId, TypeKind};

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;

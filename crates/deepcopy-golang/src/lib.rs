//! Go deep-copy method generation.
//!
//! Given a [`TypeArena`](deepcopy_core::TypeArena) describing a Go type, [`synthesize`]
//! produces the source of a `Copy` method returning an independent copy of a value of
//! that type, together with the imports that method needs.

pub mod emitter;
pub mod imports;
pub mod naming;
pub mod render;
pub mod synth;
pub mod traversal;

pub use imports::ImportResolver;
pub use synth::{synthesize, Synthesis, Synthesizer};

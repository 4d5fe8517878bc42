//! Search path management.
//!
//! - [`registry`] - Session-scoped, de-duplicated search path
//! - [`persist`] - Opt-in persistence into shell startup files

pub mod persist;
pub mod registry;

pub use persist::{home_relative, path_line, persist, PersistenceTarget};
pub use registry::PathRegistry;

//! Runtime version management.

pub mod manager;
pub mod resolver;

pub use manager::RuntimeManager;
pub use resolver::{Activation, VersionPreference, VersionResolver};

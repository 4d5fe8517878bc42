//! External tools: descriptors, probing, and the well-known set.

pub mod catalog;
pub mod probe;
pub mod tool;

pub use probe::{leading_major, CapabilityProbe, ProbeResult};
pub use tool::{PresenceCheck, Tool};

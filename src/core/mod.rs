//! Core firmware infrastructure
//!
//! Cross-context state sharing and the trait re-exports the subsystems
//! build on.

pub mod traits;

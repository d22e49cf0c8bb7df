//! Local dataset access.

pub mod loader;

pub use loader::*;

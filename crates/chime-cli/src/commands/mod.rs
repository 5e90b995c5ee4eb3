//! CLI command implementations.

pub mod edit;
pub mod events;
pub mod export;
pub mod install;

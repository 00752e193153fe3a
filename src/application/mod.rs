//! Application layer (use-cases, policies).
//!
//! Orchestrates validation and persistence for the presentation layer
//! without depending on any UI.

pub mod registry;

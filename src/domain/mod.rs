//! Domain types for the livelihood registry.
//! Defines the records kept by the office and the errors raised around them.

pub mod beneficiary;
pub mod error;
pub mod project;
pub mod user;

pub use beneficiary::*;
pub use error::*;
pub use project::*;
pub use user::*;

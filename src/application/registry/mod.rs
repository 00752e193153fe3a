pub mod roster;
pub mod service;
pub mod validation;

pub use roster::RosterEntry;
pub use service::{Registry, RegistryResult};
pub use validation::{BeneficiaryLookup, ProjectLookup};

#[cfg(test)]
mod tests;

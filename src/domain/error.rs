//! Domain error types for the registry.
//!
//! Validation problems are user-correctable and travel as data inside a
//! [`Verdict`]; everything else is a [`RegistryError`].

use super::beneficiary::BeneficiaryId;
use super::project::ProjectId;
use serde::Serialize;
use thiserror::Error;

/// Reasons a draft is rejected before it is written.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ValidationError {
    #[error("Project Name and Category are required.")]
    ProjectFieldsRequired,

    #[error("Please select a valid category.")]
    InvalidCategory(String),

    #[error("Project already exists.")]
    DuplicateProject,

    #[error("Last name and First name are required.")]
    NamesRequired,

    #[error("Please select a valid project.")]
    ProjectNotSelected,

    #[error("Invalid project selected.")]
    UnknownProject(ProjectId),

    #[error("Duplicate beneficiary exists.")]
    DuplicateBeneficiary,
}

/// Outcome of a validation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(ValidationError),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// Human-readable reason; empty when accepted.
    pub fn message(&self) -> String {
        match self {
            Verdict::Accepted => String::new(),
            Verdict::Rejected(err) => err.to_string(),
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Verdict::Accepted => Ok(()),
            Verdict::Rejected(err) => Err(err),
        }
    }
}

impl From<ValidationError> for Verdict {
    fn from(err: ValidationError) -> Self {
        Verdict::Rejected(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Project,
    Beneficiary,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Project => write!(f, "project"),
            Entity::Beneficiary => write!(f, "beneficiary"),
        }
    }
}

/// Errors surfaced by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: i64 },

    #[error("Project {project_id} is still assigned to {beneficiaries} beneficiaries")]
    ProjectInUse {
        project_id: ProjectId,
        beneficiaries: usize,
    },

    #[error("Storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl RegistryError {
    pub fn project_not_found(id: ProjectId) -> Self {
        RegistryError::NotFound {
            entity: Entity::Project,
            id,
        }
    }

    pub fn beneficiary_not_found(id: BeneficiaryId) -> Self {
        RegistryError::NotFound {
            entity: Entity::Beneficiary,
            id,
        }
    }

    pub fn is_user_correctable(&self) -> bool {
        !matches!(self, RegistryError::Storage(_))
    }
}

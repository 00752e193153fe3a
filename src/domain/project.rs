use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Value stored in place of a blank name or an unselected category.
pub const SENTINEL: &str = "-";

/// Placeholder entry of the category picker. Older databases store it
/// verbatim when no category was chosen.
pub const CATEGORY_PLACEHOLDER: &str = "- CATEGORY -";

pub type ProjectId = i64;

/// Program offerings a project can be filed under.
///
/// The labels are persisted verbatim, so their spelling must not change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProjectCategory {
    #[serde(rename = "SPECIAL PROGRAM FOR THE EMPLOYMENT OF STUDENTS AND OUT-SCHOOL YOUTH (SPES) IMPLEMENTATION")]
    Spes,
    #[serde(rename = "LIVELIHOOD ASSISTANCE REGISTRATION")]
    LivelihoodAssistance,
    #[serde(rename = "OFW/MGIRANT DESK ASSISTANCE")]
    OfwMigrantDesk,
    #[serde(rename = "SKILLS TRAINING PROGRAM REGISTRATION")]
    SkillsTraining,
    #[serde(rename = "GOVERNEMENT INTERNSHIP PROGRAM (GIP) APPLICATION")]
    GovernmentInternship,
    #[serde(rename = "JOB REFERRAL ISSUANCE")]
    JobReferral,
    #[serde(rename = "ESTABLISHMENT ACCREDITATION")]
    EstablishmentAccreditation,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 7] = [
        ProjectCategory::Spes,
        ProjectCategory::LivelihoodAssistance,
        ProjectCategory::OfwMigrantDesk,
        ProjectCategory::SkillsTraining,
        ProjectCategory::GovernmentInternship,
        ProjectCategory::JobReferral,
        ProjectCategory::EstablishmentAccreditation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectCategory::Spes => {
                "SPECIAL PROGRAM FOR THE EMPLOYMENT OF STUDENTS AND OUT-SCHOOL YOUTH (SPES) IMPLEMENTATION"
            }
            ProjectCategory::LivelihoodAssistance => "LIVELIHOOD ASSISTANCE REGISTRATION",
            ProjectCategory::OfwMigrantDesk => "OFW/MGIRANT DESK ASSISTANCE",
            ProjectCategory::SkillsTraining => "SKILLS TRAINING PROGRAM REGISTRATION",
            ProjectCategory::GovernmentInternship => {
                "GOVERNEMENT INTERNSHIP PROGRAM (GIP) APPLICATION"
            }
            ProjectCategory::JobReferral => "JOB REFERRAL ISSUANCE",
            ProjectCategory::EstablishmentAccreditation => "ESTABLISHMENT ACCREDITATION",
        }
    }

    /// Parse a stored or typed category where `-`, blank or the picker
    /// placeholder means "none selected".
    pub fn parse_optional(input: &str) -> Result<Option<Self>, String> {
        let input = input.trim();
        if input.is_empty()
            || input == SENTINEL
            || input.eq_ignore_ascii_case(CATEGORY_PLACEHOLDER)
        {
            return Ok(None);
        }
        Self::from_str(input).map(Some)
    }
}

impl std::fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProjectCategory {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        ProjectCategory::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(input))
            .ok_or_else(|| format!("invalid project category: {input}"))
    }
}

/// A stored project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub category: Option<ProjectCategory>,
}

impl Project {
    pub fn category_label(&self) -> &str {
        category_label(self.category.as_ref())
    }
}

pub fn category_label(category: Option<&ProjectCategory>) -> &'static str {
    category.map(ProjectCategory::label).unwrap_or(SENTINEL)
}

/// Raw project form input, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub category: String,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }

    /// Trimmed name, `-` when blank.
    pub fn normalized_name(&self) -> String {
        or_sentinel(&self.name)
    }

    /// Trimmed category text, `-` when blank.
    ///
    /// Known categories are written with their canonical label so that
    /// duplicate checks compare like with like.
    pub fn normalized_category(&self) -> String {
        let category = or_sentinel(&self.category);
        match ProjectCategory::parse_optional(&category) {
            Ok(Some(known)) => known.label().to_string(),
            Ok(None) => SENTINEL.to_string(),
            Err(_) => category,
        }
    }
}

fn or_sentinel(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        SENTINEL.to_string()
    } else {
        trimmed.to_string()
    }
}

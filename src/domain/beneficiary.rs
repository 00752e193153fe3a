use super::project::{ProjectId, SENTINEL};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type BeneficiaryId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suffix {
    #[serde(rename = "SR.")]
    Senior,
    #[serde(rename = "JR.")]
    Junior,
    #[serde(rename = "II")]
    Second,
    /// Catch-all for third generation and beyond.
    #[serde(rename = "III, IV, V, etc.")]
    ThirdOrLater,
}

impl Suffix {
    pub const ALL: [Suffix; 4] = [
        Suffix::Senior,
        Suffix::Junior,
        Suffix::Second,
        Suffix::ThirdOrLater,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Suffix::Senior => "SR.",
            Suffix::Junior => "JR.",
            Suffix::Second => "II",
            Suffix::ThirdOrLater => "III, IV, V, etc.",
        }
    }
}

impl std::fmt::Display for Suffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Suffix {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_uppercase().as_str() {
            "SR" | "SR." => Ok(Suffix::Senior),
            "JR" | "JR." => Ok(Suffix::Junior),
            "II" => Ok(Suffix::Second),
            "III" | "IV" | "V" | "III, IV, V, ETC." => Ok(Suffix::ThirdOrLater),
            other => Err(format!("invalid suffix: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_uppercase().as_str() {
            "MALE" | "M" => Ok(Gender::Male),
            "FEMALE" | "F" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            other => Err(format!("invalid gender: {other}")),
        }
    }
}

/// Decode a stored enum column where blank and `-` both mean "none".
pub(crate) fn decode_choice<T: FromStr>(stored: &str) -> Option<T> {
    let stored = stored.trim();
    if stored.is_empty() || stored == SENTINEL {
        return None;
    }
    stored.parse().ok()
}

/// Encode an optional enum column the way the forms always wrote it.
pub(crate) fn encode_choice(label: Option<&'static str>) -> &'static str {
    label.unwrap_or(SENTINEL)
}

/// A stored beneficiary. Blank free-text fields are `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Beneficiary {
    pub id: BeneficiaryId,
    pub lname: String,
    pub fname: String,
    pub mname: Option<String>,
    pub suffix: Option<Suffix>,
    pub gender: Option<Gender>,
    pub street: Option<String>,
    pub barangay: Option<String>,
    pub contactno: Option<String>,
    /// `None` only for rows written without going through validation.
    pub project_id: Option<ProjectId>,
}

impl Beneficiary {
    pub fn full_name(&self) -> String {
        let mut parts = vec![self.fname.as_str()];
        if let Some(mname) = self.mname.as_deref() {
            parts.push(mname);
        }
        parts.push(self.lname.as_str());
        if let Some(suffix) = self.suffix {
            parts.push(suffix.label());
        }
        parts.join(" ")
    }
}

/// Raw beneficiary form input, before validation.
///
/// `project_id` is `None` when no project was picked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BeneficiaryDraft {
    pub lname: String,
    pub fname: String,
    pub mname: String,
    pub suffix: Option<Suffix>,
    pub gender: Option<Gender>,
    pub street: String,
    pub barangay: String,
    pub contactno: String,
    pub project_id: Option<ProjectId>,
}

impl BeneficiaryDraft {
    pub fn new(lname: impl Into<String>, fname: impl Into<String>) -> Self {
        Self {
            lname: lname.into(),
            fname: fname.into(),
            ..Default::default()
        }
    }

    pub fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_mname(mut self, mname: impl Into<String>) -> Self {
        self.mname = mname.into();
        self
    }

    pub fn with_suffix(mut self, suffix: Suffix) -> Self {
        self.suffix = Some(suffix);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_address(mut self, street: impl Into<String>, barangay: impl Into<String>) -> Self {
        self.street = street.into();
        self.barangay = barangay.into();
        self
    }

    pub fn with_contactno(mut self, contactno: impl Into<String>) -> Self {
        self.contactno = contactno.into();
        self
    }

    /// Copy of the draft with every free-text field trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            lname: self.lname.trim().to_string(),
            fname: self.fname.trim().to_string(),
            mname: self.mname.trim().to_string(),
            suffix: self.suffix,
            gender: self.gender,
            street: self.street.trim().to_string(),
            barangay: self.barangay.trim().to_string(),
            contactno: self.contactno.trim().to_string(),
            project_id: self.project_id,
        }
    }
}

impl From<&Beneficiary> for BeneficiaryDraft {
    fn from(b: &Beneficiary) -> Self {
        Self {
            lname: b.lname.clone(),
            fname: b.fname.clone(),
            mname: b.mname.clone().unwrap_or_default(),
            suffix: b.suffix,
            gender: b.gender,
            street: b.street.clone().unwrap_or_default(),
            barangay: b.barangay.clone().unwrap_or_default(),
            contactno: b.contactno.clone().unwrap_or_default(),
            project_id: b.project_id,
        }
    }
}

/// Display projection of a beneficiary: blank text columns read as `-`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BeneficiaryRow {
    pub id: BeneficiaryId,
    pub lname: String,
    pub fname: String,
    pub mname: String,
    pub suffix: String,
    pub gender: String,
    pub street: String,
    pub barangay: String,
    pub contactno: String,
    pub project_id: Option<ProjectId>,
}

impl BeneficiaryRow {
    pub fn text_columns(&self) -> [&str; 8] {
        [
            self.lname.as_str(),
            self.fname.as_str(),
            self.mname.as_str(),
            self.suffix.as_str(),
            self.gender.as_str(),
            self.street.as_str(),
            self.barangay.as_str(),
            self.contactno.as_str(),
        ]
    }
}

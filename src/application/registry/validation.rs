//! Validation gates run before every project or beneficiary write.
//!
//! Checks run in a fixed order and stop at the first failure. Rejections are
//! returned as a [`Verdict`]; only storage faults are errors.

use crate::domain::{
    BeneficiaryDraft, BeneficiaryId, ProjectCategory, ProjectDraft, ProjectId, ValidationError,
    Verdict,
};
use crate::infra::db::{BeneficiaryRepository, ProjectRepository};
use anyhow::Result;

/// Project lookups the gates depend on.
pub trait ProjectLookup {
    fn project_exists(&self, id: ProjectId) -> Result<bool>;
    fn project_duplicate(&self, draft: &ProjectDraft, exclude: Option<ProjectId>)
    -> Result<bool>;
}

/// Beneficiary lookups the gates depend on.
pub trait BeneficiaryLookup {
    fn beneficiary_duplicate(
        &self,
        draft: &BeneficiaryDraft,
        exclude: Option<BeneficiaryId>,
    ) -> Result<bool>;
}

impl ProjectLookup for ProjectRepository {
    fn project_exists(&self, id: ProjectId) -> Result<bool> {
        self.exists(id)
    }

    fn project_duplicate(
        &self,
        draft: &ProjectDraft,
        exclude: Option<ProjectId>,
    ) -> Result<bool> {
        self.has_duplicate(draft, exclude)
    }
}

impl BeneficiaryLookup for BeneficiaryRepository {
    fn beneficiary_duplicate(
        &self,
        draft: &BeneficiaryDraft,
        exclude: Option<BeneficiaryId>,
    ) -> Result<bool> {
        self.has_duplicate(draft, exclude)
    }
}

/// Gate for project creation (`editing == None`) and edits.
///
/// 1. name and category must be non-blank
/// 2. category must be `-` or a known label
/// 3. no other project may share the normalized (name, category)
pub fn validate_project(
    projects: &impl ProjectLookup,
    draft: &ProjectDraft,
    editing: Option<ProjectId>,
) -> Result<Verdict> {
    if draft.name.trim().is_empty() || draft.category.trim().is_empty() {
        return Ok(ValidationError::ProjectFieldsRequired.into());
    }

    if ProjectCategory::parse_optional(&draft.category).is_err() {
        return Ok(ValidationError::InvalidCategory(draft.category.trim().to_string()).into());
    }

    if projects.project_duplicate(draft, editing)? {
        return Ok(ValidationError::DuplicateProject.into());
    }

    Ok(Verdict::Accepted)
}

/// Gate for beneficiary creation (`editing == None`) and edits.
///
/// 1. last and first name must be non-blank
/// 2. a project must be selected
/// 3. the project must exist
/// 4. no other record may share (lname, fname, mname, suffix); the record
///    being edited is excluded
pub fn validate_beneficiary(
    projects: &impl ProjectLookup,
    beneficiaries: &impl BeneficiaryLookup,
    draft: &BeneficiaryDraft,
    editing: Option<BeneficiaryId>,
) -> Result<Verdict> {
    if draft.lname.trim().is_empty() || draft.fname.trim().is_empty() {
        return Ok(ValidationError::NamesRequired.into());
    }

    let Some(project_id) = draft.project_id else {
        return Ok(ValidationError::ProjectNotSelected.into());
    };

    if !projects.project_exists(project_id)? {
        return Ok(ValidationError::UnknownProject(project_id).into());
    }

    if beneficiaries.beneficiary_duplicate(draft, editing)? {
        return Ok(ValidationError::DuplicateBeneficiary.into());
    }

    Ok(Verdict::Accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// In-memory stand-in that records how many lookups were made.
    #[derive(Default)]
    struct FakeStore {
        known_project: Option<ProjectId>,
        duplicate: bool,
        lookups: Cell<usize>,
    }

    impl ProjectLookup for FakeStore {
        fn project_exists(&self, id: ProjectId) -> Result<bool> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(self.known_project == Some(id))
        }

        fn project_duplicate(&self, _: &ProjectDraft, _: Option<ProjectId>) -> Result<bool> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(self.duplicate)
        }
    }

    impl BeneficiaryLookup for FakeStore {
        fn beneficiary_duplicate(
            &self,
            _: &BeneficiaryDraft,
            _: Option<BeneficiaryId>,
        ) -> Result<bool> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(self.duplicate)
        }
    }

    struct FailingStore;

    impl ProjectLookup for FailingStore {
        fn project_exists(&self, _: ProjectId) -> Result<bool> {
            anyhow::bail!("database is locked")
        }

        fn project_duplicate(&self, _: &ProjectDraft, _: Option<ProjectId>) -> Result<bool> {
            anyhow::bail!("database is locked")
        }
    }

    fn rejection(verdict: Verdict) -> ValidationError {
        match verdict {
            Verdict::Rejected(err) => err,
            Verdict::Accepted => panic!("expected a rejection"),
        }
    }

    #[test]
    fn project_requires_name_and_category() {
        let store = FakeStore::default();
        for (name, category) in [("  ", "JOB REFERRAL ISSUANCE"), ("Welding", " "), ("", "")] {
            let verdict =
                validate_project(&store, &ProjectDraft::new(name, category), None).unwrap();
            assert_eq!(rejection(verdict), ValidationError::ProjectFieldsRequired);
        }
        assert_eq!(store.lookups.get(), 0);
    }

    #[test]
    fn project_rejects_unknown_category() {
        let store = FakeStore::default();
        let verdict =
            validate_project(&store, &ProjectDraft::new("Welding", "FARMING"), None).unwrap();
        assert_eq!(
            rejection(verdict),
            ValidationError::InvalidCategory("FARMING".into())
        );
    }

    #[test]
    fn project_duplicate_and_accept() {
        let draft = ProjectDraft::new("Skills Training", "SKILLS TRAINING PROGRAM REGISTRATION");
        let dup = FakeStore {
            duplicate: true,
            ..Default::default()
        };
        let verdict = validate_project(&dup, &draft, None).unwrap();
        assert_eq!(verdict.message(), "Project already exists.");

        let verdict = validate_project(&FakeStore::default(), &draft, None).unwrap();
        assert!(verdict.is_accepted());
        assert_eq!(verdict.message(), "");

        let sentinel = ProjectDraft::new("Skills Training", "-");
        assert!(
            validate_project(&FakeStore::default(), &sentinel, None)
                .unwrap()
                .is_accepted()
        );
    }

    #[test]
    fn beneficiary_checks_run_in_order() {
        // Blank names win even when every other check would also fail.
        let store = FakeStore {
            duplicate: true,
            ..Default::default()
        };
        let draft = BeneficiaryDraft::new(" ", "JUAN");
        let verdict = validate_beneficiary(&store, &store, &draft, None).unwrap();
        assert_eq!(rejection(verdict), ValidationError::NamesRequired);
        assert_eq!(store.lookups.get(), 0);

        let draft = BeneficiaryDraft::new("DELACRUZ", "JUAN");
        let verdict = validate_beneficiary(&store, &store, &draft, None).unwrap();
        assert_eq!(verdict.message(), "Please select a valid project.");

        let draft = draft.with_project(7);
        let verdict = validate_beneficiary(&store, &store, &draft, None).unwrap();
        assert_eq!(rejection(verdict), ValidationError::UnknownProject(7));
        assert_eq!(verdict_message(&store, &draft), "Invalid project selected.");

        let store = FakeStore {
            known_project: Some(7),
            duplicate: true,
            ..Default::default()
        };
        let verdict = validate_beneficiary(&store, &store, &draft, None).unwrap();
        assert_eq!(rejection(verdict), ValidationError::DuplicateBeneficiary);

        let store = FakeStore {
            known_project: Some(7),
            ..Default::default()
        };
        assert!(
            validate_beneficiary(&store, &store, &draft, Some(1))
                .unwrap()
                .is_accepted()
        );
    }

    fn verdict_message(store: &FakeStore, draft: &BeneficiaryDraft) -> String {
        validate_beneficiary(store, store, draft, None)
            .unwrap()
            .message()
    }

    #[test]
    fn storage_faults_are_errors_not_rejections() {
        let draft = BeneficiaryDraft::new("DELACRUZ", "JUAN").with_project(1);
        let err = validate_beneficiary(&FailingStore, &FakeStore::default(), &draft, None)
            .unwrap_err();
        assert!(err.to_string().contains("database is locked"));

        let err = validate_project(
            &FailingStore,
            &ProjectDraft::new("Welding", "JOB REFERRAL ISSUANCE"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("locked"));
    }
}

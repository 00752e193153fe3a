use super::roster::{RosterEntry, project_matches};
use super::validation::{validate_beneficiary, validate_project};
use crate::domain::{
    Beneficiary, BeneficiaryDraft, BeneficiaryId, BeneficiaryRow, Project, ProjectDraft,
    ProjectId, RegistryError, Verdict,
};
use crate::infra::db::{BeneficiaryRepository, Database, ProjectRepository, UserRepository};
use std::collections::BTreeMap;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Entry point the presentation layer talks to.
///
/// `add_*`/`edit_*` write without re-validating, so callers run the matching
/// `validate_*` first or use `save_*`, which does both. The two steps are not
/// atomic.
pub struct Registry {
    users: UserRepository,
    projects: ProjectRepository,
    beneficiaries: BeneficiaryRepository,
}

impl Registry {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.user_repo(),
            projects: db.project_repo(),
            beneficiaries: db.beneficiary_repo(),
        }
    }

    pub fn validate_login(&self, username: &str, password: &str) -> RegistryResult<bool> {
        let ok = self.users.credentials_match(username, password)?;
        if !ok {
            log::debug!("Rejected login for '{}'", username);
        }
        Ok(ok)
    }

    // Projects

    pub fn validate_project(
        &self,
        draft: &ProjectDraft,
        editing: Option<ProjectId>,
    ) -> RegistryResult<Verdict> {
        let verdict = validate_project(&self.projects, draft, editing)?;
        if let Verdict::Rejected(reason) = &verdict {
            log::debug!("Project rejected: {}", reason);
        }
        Ok(verdict)
    }

    pub fn add_project(&self, draft: &ProjectDraft) -> RegistryResult<ProjectId> {
        let id = self.projects.insert(draft)?;
        log::info!("Added project {}", id);
        Ok(id)
    }

    pub fn edit_project(&self, id: ProjectId, draft: &ProjectDraft) -> RegistryResult<()> {
        match self.projects.update(id, draft)? {
            0 => Err(RegistryError::project_not_found(id)),
            _ => {
                log::info!("Updated project {}", id);
                Ok(())
            }
        }
    }

    /// Refuses while any beneficiary still references the project.
    pub fn delete_project(&self, id: ProjectId) -> RegistryResult<()> {
        let assigned = self.beneficiaries.count_for_project(id)?;
        if assigned > 0 {
            return Err(RegistryError::ProjectInUse {
                project_id: id,
                beneficiaries: assigned,
            });
        }
        match self.projects.delete(id)? {
            0 => Err(RegistryError::project_not_found(id)),
            _ => {
                log::info!("Deleted project {}", id);
                Ok(())
            }
        }
    }

    /// Validate, then insert (`editing == None`) or update.
    pub fn save_project(
        &self,
        editing: Option<ProjectId>,
        draft: &ProjectDraft,
    ) -> RegistryResult<ProjectId> {
        self.validate_project(draft, editing)?.into_result()?;
        match editing {
            Some(id) => self.edit_project(id, draft).map(|_| id),
            None => self.add_project(draft),
        }
    }

    pub fn get_project_by_id(&self, id: ProjectId) -> RegistryResult<Option<Project>> {
        Ok(self.projects.find_by_id(id)?)
    }

    pub fn get_projects_list(&self) -> RegistryResult<Vec<Project>> {
        Ok(self.projects.list_all()?)
    }

    pub fn get_projects_map(&self) -> RegistryResult<BTreeMap<ProjectId, String>> {
        Ok(self.projects.name_map()?)
    }

    pub fn search_projects(&self, term: &str) -> RegistryResult<Vec<Project>> {
        let mut projects = self.projects.list_all()?;
        projects.retain(|p| project_matches(p, term));
        Ok(projects)
    }

    pub fn count_beneficiaries_for_project(&self, id: ProjectId) -> RegistryResult<usize> {
        Ok(self.beneficiaries.count_for_project(id)?)
    }

    // Beneficiaries

    pub fn validate_beneficiary(
        &self,
        draft: &BeneficiaryDraft,
        editing: Option<BeneficiaryId>,
    ) -> RegistryResult<Verdict> {
        let verdict = validate_beneficiary(&self.projects, &self.beneficiaries, draft, editing)?;
        if let Verdict::Rejected(reason) = &verdict {
            log::debug!("Beneficiary rejected: {}", reason);
        }
        Ok(verdict)
    }

    pub fn add_beneficiary(&self, draft: &BeneficiaryDraft) -> RegistryResult<BeneficiaryId> {
        let id = self.beneficiaries.insert(draft)?;
        log::info!("Added beneficiary {}", id);
        Ok(id)
    }

    pub fn edit_beneficiary(
        &self,
        id: BeneficiaryId,
        draft: &BeneficiaryDraft,
    ) -> RegistryResult<()> {
        match self.beneficiaries.update(id, draft)? {
            0 => Err(RegistryError::beneficiary_not_found(id)),
            _ => {
                log::info!("Updated beneficiary {}", id);
                Ok(())
            }
        }
    }

    pub fn delete_beneficiary(&self, id: BeneficiaryId) -> RegistryResult<()> {
        match self.beneficiaries.delete(id)? {
            0 => Err(RegistryError::beneficiary_not_found(id)),
            _ => {
                log::info!("Deleted beneficiary {}", id);
                Ok(())
            }
        }
    }

    /// Validate, then insert (`editing == None`) or update.
    pub fn save_beneficiary(
        &self,
        editing: Option<BeneficiaryId>,
        draft: &BeneficiaryDraft,
    ) -> RegistryResult<BeneficiaryId> {
        self.validate_beneficiary(draft, editing)?.into_result()?;
        match editing {
            Some(id) => self.edit_beneficiary(id, draft).map(|_| id),
            None => self.add_beneficiary(draft),
        }
    }

    pub fn get_beneficiary_by_id(&self, id: BeneficiaryId) -> RegistryResult<Option<Beneficiary>> {
        Ok(self.beneficiaries.find_by_id(id)?)
    }

    pub fn get_beneficiaries(&self) -> RegistryResult<Vec<BeneficiaryRow>> {
        Ok(self.beneficiaries.list_rows()?)
    }

    /// Beneficiary rows joined with project names, filtered by `term`.
    pub fn search_beneficiaries(&self, term: &str) -> RegistryResult<Vec<RosterEntry>> {
        let projects = self.projects.name_map()?;
        Ok(self
            .beneficiaries
            .list_rows()?
            .into_iter()
            .map(|row| RosterEntry::resolve(row, &projects))
            .filter(|entry| entry.matches(term))
            .collect())
    }
}

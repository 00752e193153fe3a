//! Terminal front end over the registry.
//!
//! These handlers stand in for the data-entry forms and tables. Typed text is
//! upper-cased and every write goes through the validation gate. Output goes
//! to any [`Write`] so tests can drive them.

pub mod table;

use crate::application::registry::Registry;
use crate::domain::{
    BeneficiaryDraft, BeneficiaryId, Gender, ProjectCategory, ProjectDraft, ProjectId,
    RegistryError, SENTINEL, Suffix,
};
use crate::infra::db::TableCounts;
use anyhow::Result;
use std::io::Write;
use std::str::FromStr;
use table::Table;

/// Longest username or password the login prompt accepts.
pub const LOGIN_FIELD_MAX: usize = 10;

/// Typed form text is stored upper-cased.
pub fn form_text(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Parse an optional choice where `-` or blank clears the value.
pub fn parse_choice<T>(input: &str) -> Result<Option<T>, String>
where
    T: FromStr<Err = String>,
{
    let input = input.trim();
    if input.is_empty() || input == SENTINEL {
        return Ok(None);
    }
    T::from_str(input).map(Some)
}

/// Beneficiary form fields; `None` leaves the current value alone on edit.
#[derive(Debug, Clone, Default)]
pub struct BeneficiaryForm {
    pub lname: Option<String>,
    pub fname: Option<String>,
    pub mname: Option<String>,
    pub suffix: Option<String>,
    pub gender: Option<String>,
    pub street: Option<String>,
    pub barangay: Option<String>,
    pub contactno: Option<String>,
    pub project_id: Option<ProjectId>,
}

impl BeneficiaryForm {
    /// Overlay the filled-in fields onto `draft`.
    pub fn apply(&self, mut draft: BeneficiaryDraft) -> Result<BeneficiaryDraft, String> {
        let text = |value: &Option<String>, current: &mut String| {
            if let Some(value) = value {
                *current = form_text(value);
            }
        };
        text(&self.lname, &mut draft.lname);
        text(&self.fname, &mut draft.fname);
        text(&self.mname, &mut draft.mname);
        text(&self.street, &mut draft.street);
        text(&self.barangay, &mut draft.barangay);
        if let Some(contactno) = &self.contactno {
            draft.contactno = contactno.trim().to_string();
        }
        if let Some(suffix) = &self.suffix {
            draft.suffix = parse_choice::<Suffix>(suffix)?;
        }
        if let Some(gender) = &self.gender {
            draft.gender = parse_choice::<Gender>(gender)?;
        }
        if let Some(project_id) = self.project_id {
            draft.project_id = Some(project_id);
        }
        Ok(draft)
    }
}

pub fn login(
    registry: &Registry,
    username: &str,
    password: &str,
    out: &mut dyn Write,
) -> Result<bool> {
    if username.chars().count() > LOGIN_FIELD_MAX || password.chars().count() > LOGIN_FIELD_MAX {
        writeln!(
            out,
            "Username and password are limited to {LOGIN_FIELD_MAX} characters."
        )?;
        return Ok(false);
    }
    if registry.validate_login(username, password)? {
        writeln!(out, "Welcome, {username}.")?;
        Ok(true)
    } else {
        writeln!(out, "Invalid username or password.")?;
        Ok(false)
    }
}

pub fn status(
    registry: &Registry,
    location: &str,
    counts: TableCounts,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "Database: {location}")?;
    writeln!(out, "Users: {}", counts.users)?;
    writeln!(out, "Projects: {}", counts.projects)?;
    writeln!(out, "Beneficiaries: {}", counts.beneficiaries)?;
    let projects = registry.get_projects_map()?;
    let unassigned = registry
        .get_beneficiaries()?
        .iter()
        .filter(|row| !row.project_id.is_some_and(|id| projects.contains_key(&id)))
        .count();
    if unassigned > 0 {
        writeln!(
            out,
            "Warning: {unassigned} beneficiaries reference a missing project."
        )?;
    }
    Ok(())
}

pub fn list_categories(out: &mut dyn Write) -> Result<()> {
    for category in ProjectCategory::ALL {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

pub fn list_projects(
    registry: &Registry,
    search: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let projects = registry.search_projects(search)?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &projects)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut table = Table::new(vec!["ID", "Project Name", "Category"]);
    for project in &projects {
        table.push(vec![
            project.id.to_string(),
            project.name.clone(),
            project.category_label().to_string(),
        ]);
    }
    if table.is_empty() {
        writeln!(out, "No projects found.")?;
    } else {
        table.write_to(out)?;
    }
    writeln!(out, "Total Projects: {}", table.len())?;
    Ok(())
}

pub fn show_project(registry: &Registry, id: ProjectId, out: &mut dyn Write) -> Result<()> {
    let project = registry
        .get_project_by_id(id)?
        .ok_or_else(|| RegistryError::project_not_found(id))?;
    writeln!(out, "Project ID: {}", project.id)?;
    writeln!(out, "Project Name: {}", project.name)?;
    writeln!(out, "Category: {}", project.category_label())?;
    writeln!(
        out,
        "Beneficiaries: {}",
        registry.count_beneficiaries_for_project(id)?
    )?;
    Ok(())
}

/// Create (`editing == None`) or update a project from form input.
pub fn save_project(
    registry: &Registry,
    editing: Option<ProjectId>,
    name: Option<&str>,
    category: Option<&str>,
    out: &mut dyn Write,
) -> Result<ProjectId> {
    let mut draft = match editing {
        Some(id) => {
            let current = registry
                .get_project_by_id(id)?
                .ok_or_else(|| RegistryError::project_not_found(id))?;
            let category = current.category_label().to_string();
            ProjectDraft::new(current.name, category)
        }
        None => ProjectDraft::default(),
    };
    if let Some(name) = name {
        draft.name = form_text(name);
    }
    if let Some(category) = category {
        draft.category = category.trim().to_string();
    }

    let id = registry.save_project(editing, &draft)?;
    match editing {
        Some(_) => writeln!(out, "Project {id} updated.")?,
        None => writeln!(out, "Project {id} added.")?,
    }
    Ok(id)
}

pub fn delete_project(registry: &Registry, id: ProjectId, out: &mut dyn Write) -> Result<()> {
    registry.delete_project(id)?;
    writeln!(out, "Project {id} deleted.")?;
    Ok(())
}

pub fn list_beneficiaries(
    registry: &Registry,
    search: &str,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let roster = registry.search_beneficiaries(search)?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &roster)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut table = Table::new(vec![
        "ID",
        "Last Name",
        "First Name",
        "Middle Name",
        "Suffix",
        "Gender",
        "Street",
        "Barangay",
        "Contact No.",
        "Projects",
    ]);
    for entry in &roster {
        let mut cells = vec![entry.row.id.to_string()];
        cells.extend(entry.row.text_columns().iter().map(|c| c.to_string()));
        cells.push(entry.project_name.clone());
        table.push(cells);
    }
    if table.is_empty() {
        writeln!(out, "No beneficiaries found.")?;
    } else {
        table.write_to(out)?;
    }
    writeln!(out, "Total Beneficiaries: {}", table.len())?;
    Ok(())
}

pub fn show_beneficiary(
    registry: &Registry,
    id: BeneficiaryId,
    out: &mut dyn Write,
) -> Result<()> {
    let b = registry
        .get_beneficiary_by_id(id)?
        .ok_or_else(|| RegistryError::beneficiary_not_found(id))?;
    let projects = registry.get_projects_map()?;
    let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| SENTINEL.to_string());

    writeln!(out, "Beneficiary ID: {}", b.id)?;
    writeln!(out, "Name: {}", b.full_name())?;
    writeln!(out, "Last Name: {}", b.lname)?;
    writeln!(out, "First Name: {}", b.fname)?;
    writeln!(out, "Middle Name: {}", or_dash(&b.mname))?;
    writeln!(
        out,
        "Suffix: {}",
        b.suffix.map(|s| s.label()).unwrap_or(SENTINEL)
    )?;
    writeln!(
        out,
        "Gender: {}",
        b.gender.map(|g| g.label()).unwrap_or(SENTINEL)
    )?;
    writeln!(out, "Street: {}", or_dash(&b.street))?;
    writeln!(out, "Barangay: {}", or_dash(&b.barangay))?;
    writeln!(out, "Contact No.: {}", or_dash(&b.contactno))?;
    let project = b
        .project_id
        .and_then(|pid| projects.get(&pid).cloned())
        .unwrap_or_else(|| SENTINEL.to_string());
    writeln!(out, "Project: {project}")?;
    Ok(())
}

/// Create (`editing == None`) or update a beneficiary from form input.
pub fn save_beneficiary(
    registry: &Registry,
    editing: Option<BeneficiaryId>,
    form: &BeneficiaryForm,
    out: &mut dyn Write,
) -> Result<BeneficiaryId> {
    let base = match editing {
        Some(id) => {
            let current = registry
                .get_beneficiary_by_id(id)?
                .ok_or_else(|| RegistryError::beneficiary_not_found(id))?;
            BeneficiaryDraft::from(&current)
        }
        None => BeneficiaryDraft::default(),
    };
    let draft = form.apply(base).map_err(anyhow::Error::msg)?;

    let id = registry.save_beneficiary(editing, &draft)?;
    match editing {
        Some(_) => writeln!(out, "Beneficiary {id} updated.")?,
        None => writeln!(out, "Beneficiary {id} added.")?,
    }
    Ok(id)
}

pub fn delete_beneficiary(
    registry: &Registry,
    id: BeneficiaryId,
    out: &mut dyn Write,
) -> Result<()> {
    registry.delete_beneficiary(id)?;
    writeln!(out, "Beneficiary {id} deleted.")?;
    Ok(())
}

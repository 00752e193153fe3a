use super::{DbConn, Repository, lock};
use crate::domain::{Project, ProjectCategory, ProjectDraft, ProjectId, SENTINEL};
use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, Row, params};
use std::collections::BTreeMap;

/// Repository for project operations.
pub struct ProjectRepository {
    conn: DbConn,
}

impl Repository for ProjectRepository {}

impl ProjectRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Insert a project, trimming input and writing `-` for blanks.
    pub fn insert(&self, draft: &ProjectDraft) -> Result<ProjectId> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO projects (project_name, category) VALUES (?1, ?2)",
            params![draft.normalized_name(), draft.normalized_category()],
        )
        .context("insert project")?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns the number of rows updated; zero when `id` does not exist.
    pub fn update(&self, id: ProjectId, draft: &ProjectDraft) -> Result<usize> {
        let conn = lock(&self.conn)?;
        let affected = conn
            .execute(
                "UPDATE projects SET project_name = ?1, category = ?2 WHERE project_id = ?3",
                params![draft.normalized_name(), draft.normalized_category(), id],
            )
            .context("update project")?;
        Ok(affected)
    }

    pub fn delete(&self, id: ProjectId) -> Result<usize> {
        let conn = lock(&self.conn)?;
        let affected = conn
            .execute("DELETE FROM projects WHERE project_id = ?1", [id])
            .context("delete project")?;
        Ok(affected)
    }

    pub fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>> {
        let conn = lock(&self.conn)?;
        let project = conn
            .query_row(
                "SELECT project_id, project_name, category FROM projects WHERE project_id = ?1",
                [id],
                Self::row_to_project,
            )
            .optional()
            .context("fetch project")?;
        Ok(project)
    }

    pub fn exists(&self, id: ProjectId) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT 1 FROM projects WHERE project_id = ?1")?;
        Ok(stmt.exists([id])?)
    }

    pub fn list_all(&self) -> Result<Vec<Project>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT project_id, project_name, category FROM projects ORDER BY project_id",
        )?;
        let rows = stmt.query_map([], Self::row_to_project)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Project id to project name, for resolving beneficiary rows.
    pub fn name_map(&self) -> Result<BTreeMap<ProjectId, String>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT project_id, project_name FROM projects")?;
        let rows = stmt.query_map([], |row| {
            let name: Option<String> = row.get(1)?;
            Ok((
                row.get::<_, ProjectId>(0)?,
                name.unwrap_or_else(|| SENTINEL.to_string()),
            ))
        })?;
        rows.collect::<Result<BTreeMap<_, _>, _>>()
            .map_err(Into::into)
    }

    /// Whether another project already uses this normalized name and category.
    pub fn has_duplicate(&self, draft: &ProjectDraft, exclude: Option<ProjectId>) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT 1 FROM projects
            WHERE project_name = ?1 AND category = ?2
              AND (?3 IS NULL OR project_id != ?3)
            LIMIT 1
            "#,
        )?;
        let found = stmt
            .exists(params![
                draft.normalized_name(),
                draft.normalized_category(),
                exclude
            ])
            .context("check duplicate project")?;
        Ok(found)
    }

    fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
        let name: Option<String> = row.get(1)?;
        let category: Option<String> = row.get(2)?;
        let category = category.as_deref().and_then(|stored| {
            ProjectCategory::parse_optional(stored).unwrap_or_else(|err| {
                log::warn!("Project has unrecognised category: {}", err);
                None
            })
        });
        Ok(Project {
            id: row.get(0)?,
            name: name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| SENTINEL.to_string()),
            category,
        })
    }
}

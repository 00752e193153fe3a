use super::{DbConn, Repository, lock, non_blank};
use crate::domain::{
    Beneficiary, BeneficiaryDraft, BeneficiaryId, BeneficiaryRow, ProjectId, Suffix,
    decode_choice, encode_choice,
};
use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, Row, params};

/// Repository for beneficiary operations.
pub struct BeneficiaryRepository {
    conn: DbConn,
}

impl Repository for BeneficiaryRepository {}

impl BeneficiaryRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Insert one row. Optional text is trimmed and kept as `""` when blank.
    pub fn insert(&self, draft: &BeneficiaryDraft) -> Result<BeneficiaryId> {
        let b = draft.normalized();
        let conn = lock(&self.conn)?;
        conn.execute(
            r#"
            INSERT INTO beneficiaries
                (lname, fname, mname, suffix, gender, street, barangay, contactno, project_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                b.lname,
                b.fname,
                b.mname,
                encode_choice(b.suffix.as_ref().map(Suffix::label)),
                encode_choice(b.gender.as_ref().map(|g| g.label())),
                b.street,
                b.barangay,
                b.contactno,
                b.project_id,
            ],
        )
        .context("insert beneficiary")?;
        Ok(conn.last_insert_rowid())
    }

    /// Overwrite every mutable field. Returns the number of rows updated.
    pub fn update(&self, id: BeneficiaryId, draft: &BeneficiaryDraft) -> Result<usize> {
        let b = draft.normalized();
        let conn = lock(&self.conn)?;
        let affected = conn
            .execute(
                r#"
                UPDATE beneficiaries
                SET lname = ?1, fname = ?2, mname = ?3, suffix = ?4, gender = ?5,
                    street = ?6, barangay = ?7, contactno = ?8, project_id = ?9
                WHERE beneficiary_id = ?10
                "#,
                params![
                    b.lname,
                    b.fname,
                    b.mname,
                    encode_choice(b.suffix.as_ref().map(Suffix::label)),
                    encode_choice(b.gender.as_ref().map(|g| g.label())),
                    b.street,
                    b.barangay,
                    b.contactno,
                    b.project_id,
                    id,
                ],
            )
            .context("update beneficiary")?;
        Ok(affected)
    }

    pub fn delete(&self, id: BeneficiaryId) -> Result<usize> {
        let conn = lock(&self.conn)?;
        let affected = conn
            .execute("DELETE FROM beneficiaries WHERE beneficiary_id = ?1", [id])
            .context("delete beneficiary")?;
        Ok(affected)
    }

    pub fn find_by_id(&self, id: BeneficiaryId) -> Result<Option<Beneficiary>> {
        let conn = lock(&self.conn)?;
        let beneficiary = conn
            .query_row(
                r#"
                SELECT beneficiary_id, lname, fname, mname, suffix, gender,
                       street, barangay, contactno, project_id
                FROM beneficiaries
                WHERE beneficiary_id = ?1
                "#,
                [id],
                Self::row_to_beneficiary,
            )
            .optional()
            .context("fetch beneficiary")?;
        Ok(beneficiary)
    }

    /// Table projection: blank text columns come back as `-`, the project
    /// reference is left untouched.
    pub fn list_rows(&self) -> Result<Vec<BeneficiaryRow>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                beneficiary_id,
                COALESCE(NULLIF(TRIM(lname), ''), '-'),
                COALESCE(NULLIF(TRIM(fname), ''), '-'),
                COALESCE(NULLIF(TRIM(mname), ''), '-'),
                COALESCE(NULLIF(TRIM(suffix), ''), '-'),
                COALESCE(NULLIF(TRIM(gender), ''), '-'),
                COALESCE(NULLIF(TRIM(street), ''), '-'),
                COALESCE(NULLIF(TRIM(barangay), ''), '-'),
                COALESCE(NULLIF(TRIM(contactno), ''), '-'),
                project_id
            FROM beneficiaries
            ORDER BY beneficiary_id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(BeneficiaryRow {
                id: row.get(0)?,
                lname: row.get(1)?,
                fname: row.get(2)?,
                mname: row.get(3)?,
                suffix: row.get(4)?,
                gender: row.get(5)?,
                street: row.get(6)?,
                barangay: row.get(7)?,
                contactno: row.get(8)?,
                project_id: row.get(9)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Whether a record other than `exclude` has the same
    /// (lname, fname, mname, suffix). Blank and `-` suffixes compare equal.
    pub fn has_duplicate(
        &self,
        draft: &BeneficiaryDraft,
        exclude: Option<BeneficiaryId>,
    ) -> Result<bool> {
        let b = draft.normalized();
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT 1 FROM beneficiaries
            WHERE lname = ?1 AND fname = ?2
              AND COALESCE(TRIM(mname), '') = ?3
              AND COALESCE(NULLIF(TRIM(suffix), ''), '-') = ?4
              AND (?5 IS NULL OR beneficiary_id != ?5)
            LIMIT 1
            "#,
        )?;
        let found = stmt
            .exists(params![
                b.lname,
                b.fname,
                b.mname,
                encode_choice(b.suffix.as_ref().map(Suffix::label)),
                exclude,
            ])
            .context("check duplicate beneficiary")?;
        Ok(found)
    }

    pub fn count_for_project(&self, project_id: ProjectId) -> Result<usize> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM beneficiaries WHERE project_id = ?1",
            [project_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn row_to_beneficiary(row: &Row<'_>) -> rusqlite::Result<Beneficiary> {
        let suffix: Option<String> = row.get(4)?;
        let gender: Option<String> = row.get(5)?;
        Ok(Beneficiary {
            id: row.get(0)?,
            lname: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            fname: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            mname: non_blank(row.get(3)?),
            suffix: suffix.as_deref().and_then(decode_choice),
            gender: gender.as_deref().and_then(decode_choice),
            street: non_blank(row.get(6)?),
            barangay: non_blank(row.get(7)?),
            contactno: non_blank(row.get(8)?),
            project_id: row.get(9)?,
        })
    }
}

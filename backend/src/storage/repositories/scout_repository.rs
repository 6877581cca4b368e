use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::models::Scout;
use crate::storage::db::DbConnection;
use crate::storage::repositories::person_repository::person_from_columns;

/// Columns of a scout row joined with its owning person. Person columns
/// carry a `p_` prefix so they do not collide with the scout's own.
const SCOUT_SELECT: &str = r#"
    SELECT s.id, s.person_id, s.group_number, s.unit_name,
           s.previous_scout_unit, s.previous_association, s.proposal_number,
           s.registration_date, s.matriculation_number,
           s.has_contagious_disease, s.has_physical_robustness,
           s.medical_observations,
           p.id AS p_id, p.name AS p_name, p.birth_date AS p_birth_date,
           p.gender AS p_gender, p.birth_place AS p_birth_place,
           p.province AS p_province, p.municipality AS p_municipality,
           p.commune AS p_commune, p.address AS p_address,
           p.phone_number AS p_phone_number, p.baptism_date AS p_baptism_date,
           p.baptism_church AS p_baptism_church
    FROM scouts s
    JOIN persons p ON p.id = s.person_id
"#;

/// Repository for scout rows. Reads embed the owning person; writes send
/// only the person's identifier, never the person record itself.
#[derive(Clone)]
pub struct ScoutRepository {
    db: DbConnection,
}

impl ScoutRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a new scout and return it as reconstructed from the stored
    /// row. The owning person must already be persisted.
    pub async fn store_scout(&self, scout: &Scout) -> Result<Scout> {
        if scout.person.id.is_empty() {
            bail!("scout requires an already-persisted person");
        }

        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO scouts (
                id, person_id, group_number, unit_name, previous_scout_unit,
                previous_association, proposal_number, registration_date,
                matriculation_number, has_contagious_disease,
                has_physical_robustness, medical_observations, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&scout.person.id)
        .bind(&scout.group_number)
        .bind(&scout.unit_name)
        .bind(&scout.previous_scout_unit)
        .bind(&scout.previous_association)
        .bind(&scout.proposal_number)
        .bind(scout.registration_date.map(|d| d.to_rfc3339()))
        .bind(&scout.matriculation_number)
        .bind(scout.has_contagious_disease)
        .bind(scout.has_physical_robustness)
        .bind(&scout.medical_observations)
        .bind(&created_at)
        .execute(self.db.pool())
        .await?;

        self.fetch_scout(&id)
            .await?
            .context("stored scout row missing after insert")
    }

    /// Get a scout by ID with its person embedded
    pub async fn fetch_scout(&self, scout_id: &str) -> Result<Option<Scout>> {
        let query = format!("{SCOUT_SELECT} WHERE s.id = ?");
        let row = sqlx::query(&query)
            .bind(scout_id)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(r) => Ok(Some(scout_from_row(&r)?)),
            None => Ok(None),
        }
    }

    /// List all scouts, most recently created first
    pub async fn list_scouts(&self) -> Result<Vec<Scout>> {
        let query = format!("{SCOUT_SELECT} ORDER BY s.created_at DESC, s.id DESC");
        let rows = sqlx::query(&query).fetch_all(self.db.pool()).await?;

        rows.iter().map(scout_from_row).collect()
    }

    /// Update the scout identified by `id` and return the stored result.
    /// Only scout-owned columns are touched; the person reference is
    /// immutable after creation.
    pub async fn update_scout(&self, scout: &Scout, id: &str) -> Result<Scout> {
        let result = sqlx::query(
            r#"
            UPDATE scouts
            SET group_number = ?, unit_name = ?, previous_scout_unit = ?,
                previous_association = ?, proposal_number = ?,
                registration_date = ?, matriculation_number = ?,
                has_contagious_disease = ?, has_physical_robustness = ?,
                medical_observations = ?
            WHERE id = ?
            "#,
        )
        .bind(&scout.group_number)
        .bind(&scout.unit_name)
        .bind(&scout.previous_scout_unit)
        .bind(&scout.previous_association)
        .bind(&scout.proposal_number)
        .bind(scout.registration_date.map(|d| d.to_rfc3339()))
        .bind(&scout.matriculation_number)
        .bind(scout.has_contagious_disease)
        .bind(scout.has_physical_robustness)
        .bind(&scout.medical_observations)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            bail!("scout not found: {}", id);
        }

        self.fetch_scout(id)
            .await?
            .context("updated scout row missing")
    }

    /// Delete a scout, reporting whether a row was removed. The owning
    /// person is left untouched.
    pub async fn delete_scout(&self, scout_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM scouts WHERE id = ?")
            .bind(scout_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn scout_from_row(row: &SqliteRow) -> Result<Scout> {
    let registration_date: Option<String> = row.get("registration_date");
    let registration_date = registration_date
        .map(|d| {
            DateTime::parse_from_rfc3339(&d).map(|parsed| parsed.with_timezone(&Utc))
        })
        .transpose()
        .context("failed to parse registration_date column")?;

    Ok(Scout {
        id: row.get("id"),
        person: person_from_columns(row, "p_")?,
        group_number: row.get("group_number"),
        unit_name: row.get("unit_name"),
        previous_scout_unit: row.get("previous_scout_unit"),
        previous_association: row.get("previous_association"),
        proposal_number: row.get("proposal_number"),
        registration_date,
        matriculation_number: row.get("matriculation_number"),
        has_contagious_disease: row.get("has_contagious_disease"),
        has_physical_robustness: row.get("has_physical_robustness"),
        medical_observations: row.get("medical_observations"),
    })
}

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::models::Person;
use crate::storage::db::DbConnection;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for person rows. Translates between the snake_case column
/// set and the domain model, assigning identifiers on insert.
#[derive(Clone)]
pub struct PersonRepository {
    db: DbConnection,
}

impl PersonRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a new person and return it as reconstructed from the
    /// stored row, with the store-assigned identifier populated.
    pub async fn store_person(&self, person: &Person) -> Result<Person> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO persons (
                id, name, birth_date, gender, birth_place, province,
                municipality, commune, address, phone_number,
                baptism_date, baptism_church, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&person.name)
        .bind(person.birth_date.format(DATE_FORMAT).to_string())
        .bind(&person.gender)
        .bind(&person.birth_place)
        .bind(&person.province)
        .bind(&person.municipality)
        .bind(&person.commune)
        .bind(&person.address)
        .bind(&person.phone_number)
        .bind(person.baptism_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(&person.baptism_church)
        .bind(&created_at)
        .execute(self.db.pool())
        .await?;

        self.fetch_person(&id)
            .await?
            .context("stored person row missing after insert")
    }

    /// Get a person by ID
    pub async fn fetch_person(&self, person_id: &str) -> Result<Option<Person>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, birth_date, gender, birth_place, province,
                   municipality, commune, address, phone_number,
                   baptism_date, baptism_church
            FROM persons
            WHERE id = ?
            "#,
        )
        .bind(person_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(r) => Ok(Some(person_from_row(&r)?)),
            None => Ok(None),
        }
    }

    /// List all persons ordered by name
    pub async fn list_persons(&self) -> Result<Vec<Person>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, birth_date, gender, birth_place, province,
                   municipality, commune, address, phone_number,
                   baptism_date, baptism_church
            FROM persons
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(person_from_row).collect()
    }

    /// Update the person identified by `id` and return the stored result.
    pub async fn update_person(&self, person: &Person, id: &str) -> Result<Person> {
        let result = sqlx::query(
            r#"
            UPDATE persons
            SET name = ?, birth_date = ?, gender = ?, birth_place = ?,
                province = ?, municipality = ?, commune = ?, address = ?,
                phone_number = ?, baptism_date = ?, baptism_church = ?
            WHERE id = ?
            "#,
        )
        .bind(&person.name)
        .bind(person.birth_date.format(DATE_FORMAT).to_string())
        .bind(&person.gender)
        .bind(&person.birth_place)
        .bind(&person.province)
        .bind(&person.municipality)
        .bind(&person.commune)
        .bind(&person.address)
        .bind(&person.phone_number)
        .bind(person.baptism_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(&person.baptism_church)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            bail!("person not found: {}", id);
        }

        self.fetch_person(id)
            .await?
            .context("updated person row missing")
    }

    /// Delete a person, reporting whether a row was removed.
    pub async fn delete_person(&self, person_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE id = ?")
            .bind(person_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Translate a storage row into a fully-populated person. Absent wire
/// fields map to absent entity fields, never to empty strings.
pub(crate) fn person_from_row(row: &SqliteRow) -> Result<Person> {
    person_from_columns(row, "")
}

/// Same translation for rows where the person columns carry a prefix
/// (as in the scouts join).
pub(crate) fn person_from_columns(row: &SqliteRow, prefix: &str) -> Result<Person> {
    let col = |name: &str| format!("{prefix}{name}");

    let birth_date: String = row.get(col("birth_date").as_str());
    let birth_date = NaiveDate::parse_from_str(&birth_date, DATE_FORMAT)
        .context("failed to parse birth_date column")?;

    let baptism_date: Option<String> = row.get(col("baptism_date").as_str());
    let baptism_date = baptism_date
        .map(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT))
        .transpose()
        .context("failed to parse baptism_date column")?;

    Ok(Person {
        id: row.get(col("id").as_str()),
        name: row.get(col("name").as_str()),
        birth_date,
        gender: row.get(col("gender").as_str()),
        birth_place: row.get(col("birth_place").as_str()),
        province: row.get(col("province").as_str()),
        municipality: row.get(col("municipality").as_str()),
        commune: row.get(col("commune").as_str()),
        address: row.get(col("address").as_str()),
        phone_number: row.get(col("phone_number").as_str()),
        baptism_date,
        baptism_church: row.get(col("baptism_church").as_str()),
    })
}

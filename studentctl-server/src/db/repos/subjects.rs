//! Subject repository (read-only; the catalogue is seeded by migrations)

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::db::errors::Result;
use crate::models::dates::timestamp;

/// Subject record from database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub course: String,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Subject repository
pub struct SubjectRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SubjectRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All subjects ordered by course, then name.
    pub async fn list(&self) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT id, name, code, course, created_at FROM subjects ORDER BY course, name",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(subjects)
    }

    /// Subjects offered for one course, ordered by name.
    pub async fn list_by_course(&self, course: &str) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, name, code, course, created_at
            FROM subjects
            WHERE course = $1
            ORDER BY name
            "#,
        )
        .bind(course)
        .fetch_all(self.pool)
        .await?;
        Ok(subjects)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            "SELECT id, name, code, course, created_at FROM subjects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(subject)
    }
}

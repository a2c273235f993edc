//! Student repository
//!
//! - create: roll number derived from the row's own id in the same INSERT
//! - update: password and roll number keep their stored values when absent
//! - list: newest first

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::db::errors::Result;
use crate::models::dates::timestamp;
use crate::models::NewStudent;

/// Public student columns; the password never leaves the repository here.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Login projection carrying the stored password hash.
#[derive(Clone, FromRow)]
pub struct StudentCredentials {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub course: String,
    pub roll_number: Option<String>,
    pub password: String,
}

impl fmt::Debug for StudentCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentCredentials")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("roll_number", &self.roll_number)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Dashboard row for recently created students
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub course: String,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

const STUDENT_COLUMNS: &str =
    "id, name, email, phone, course, gender, dob, city, roll_number, created_at, updated_at";

/// Student repository
pub struct StudentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> StudentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All students, newest first.
    pub async fn list(&self) -> Result<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(students)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(student)
    }

    /// Insert a student and return the stored row.
    ///
    /// Without a roll number the row gets `STU` followed by its id padded to
    /// four digits. The id is drawn from the sequence inside the statement,
    /// so two concurrent inserts can never derive the same roll number.
    pub async fn create(
        &self,
        student: &NewStudent,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Student> {
        let created = sqlx::query_as::<_, Student>(&format!(
            r#"
            WITH next AS (
                SELECT nextval(pg_get_serial_sequence('students', 'id'))::int AS id
            )
            INSERT INTO students
                (id, name, email, phone, course, gender, dob, city, password,
                 roll_number, created_at, updated_at)
            SELECT next.id, $1, $2, $3, $4, $5, $6, $7, $8,
                   COALESCE($9, 'STU' || CASE
                       WHEN next.id < 10000 THEN lpad(next.id::text, 4, '0')
                       ELSE next.id::text
                   END),
                   $10, $10
            FROM next
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(&student.name)
        .bind(student.email.as_str())
        .bind(student.phone.as_str())
        .bind(&student.course)
        .bind(&student.gender)
        .bind(student.dob)
        .bind(&student.city)
        .bind(password_hash)
        .bind(&student.roll_number)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(id = created.id, roll_number = ?created.roll_number, "Student created");
        Ok(created)
    }

    /// Overwrite a student's fields. `password_hash` and the roll number
    /// keep their stored values when `None`.
    ///
    /// Returns `false` when no row has `id`.
    pub async fn update(
        &self,
        id: i32,
        student: &NewStudent,
        password_hash: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE students SET
                name = $2,
                email = $3,
                phone = $4,
                course = $5,
                gender = $6,
                dob = $7,
                city = $8,
                password = COALESCE($9, password),
                roll_number = COALESCE($10, roll_number),
                updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&student.name)
        .bind(student.email.as_str())
        .bind(student.phone.as_str())
        .bind(&student.course)
        .bind(&student.gender)
        .bind(student.dob)
        .bind(&student.city)
        .bind(password_hash)
        .bind(&student.roll_number)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a student; marks and attendance cascade.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The `limit` most recently created students.
    pub async fn recent(&self, limit: i64) -> Result<Vec<StudentSummary>> {
        let students = sqlx::query_as::<_, StudentSummary>(
            r#"
            SELECT id, name, email, course, created_at
            FROM students
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(students)
    }

    /// Whether a student other than `exclude_id` already holds `email`.
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM students
                WHERE email = $1 AND ($2::int IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Look up login credentials by email or roll number.
    pub async fn find_credentials(&self, email_or_roll: &str) -> Result<Option<StudentCredentials>> {
        let credentials = sqlx::query_as::<_, StudentCredentials>(
            r#"
            SELECT id, name, email, course, roll_number, password
            FROM students
            WHERE email = $1 OR roll_number = $1
            ORDER BY (email = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(email_or_roll)
        .fetch_optional(self.pool)
        .await?;
        Ok(credentials)
    }
}

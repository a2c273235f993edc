//! Attendance repository
//!
//! - mark: upsert on (student, subject, date); a repeat overwrites the status
//! - percentage: present share per subject, aggregated in one query

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::db::errors::Result;
use crate::models::dates::timestamp;
use crate::models::{attendance_percentage, NewAttendance, PRESENT};

/// Attendance record with its subject name and code
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceWithSubject {
    pub id: i32,
    pub student_id: i32,
    pub subject_id: i32,
    pub attendance_date: NaiveDate,
    pub status: String,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub subject_name: String,
    pub subject_code: String,
}

/// Attendance record with student and subject names
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attendance: AttendanceWithSubject,
    pub student_name: String,
}

const ATTENDANCE_COLUMNS: &str = r#"
    a.id, a.student_id, a.subject_id, a.attendance_date, a.status, a.created_at,
    s.name AS subject_name, s.code AS subject_code
"#;

/// Attendance repository
pub struct AttendanceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AttendanceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record attendance, replacing the status of an existing mark for the
    /// same student, subject and date. Returns the row id.
    pub async fn mark(&self, attendance: &NewAttendance, now: DateTime<Utc>) -> Result<i32> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO attendance (student_id, subject_id, attendance_date, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, subject_id, attendance_date)
            DO UPDATE SET status = EXCLUDED.status
            RETURNING id
            "#,
        )
        .bind(attendance.student_id)
        .bind(attendance.subject_id)
        .bind(attendance.attendance_date)
        .bind(&attendance.status)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(
            id,
            student_id = attendance.student_id,
            subject_id = attendance.subject_id,
            date = %attendance.attendance_date,
            status = %attendance.status,
            "Attendance marked"
        );
        Ok(id)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All attendance with student and subject names, latest date first.
    pub async fn list(&self) -> Result<Vec<AttendanceWithNames>> {
        let rows = sqlx::query_as::<_, AttendanceWithNames>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}, st.name AS student_name
            FROM attendance a
            JOIN students st ON a.student_id = st.id
            JOIN subjects s ON a.subject_id = s.id
            ORDER BY a.attendance_date DESC, a.id DESC
            "#
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// One subject's roll call for a day, ordered by student name.
    pub async fn list_for_date_and_subject(
        &self,
        date: NaiveDate,
        subject_id: i32,
    ) -> Result<Vec<AttendanceWithNames>> {
        let rows = sqlx::query_as::<_, AttendanceWithNames>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}, st.name AS student_name
            FROM attendance a
            JOIN students st ON a.student_id = st.id
            JOIN subjects s ON a.subject_id = s.id
            WHERE a.attendance_date = $1 AND a.subject_id = $2
            ORDER BY st.name, a.id
            "#
        ))
        .bind(date)
        .bind(subject_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_student(&self, student_id: i32) -> Result<Vec<AttendanceWithSubject>> {
        let rows = sqlx::query_as::<_, AttendanceWithSubject>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance a
            JOIN subjects s ON a.subject_id = s.id
            WHERE a.student_id = $1
            ORDER BY a.attendance_date DESC, a.id DESC
            "#
        ))
        .bind(student_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_student_and_subject(
        &self,
        student_id: i32,
        subject_id: i32,
    ) -> Result<Vec<AttendanceWithSubject>> {
        let rows = sqlx::query_as::<_, AttendanceWithSubject>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance a
            JOIN subjects s ON a.subject_id = s.id
            WHERE a.student_id = $1 AND a.subject_id = $2
            ORDER BY a.attendance_date DESC, a.id DESC
            "#
        ))
        .bind(student_id)
        .bind(subject_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Present percentage per subject name. Subjects without any attendance
    /// rows are absent from the map. Same-named subjects from different
    /// courses stay separate, keyed as `name (code)`.
    pub async fn percentage(&self, student_id: i32) -> Result<BTreeMap<String, f64>> {
        let rows: Vec<(String, String, i64, i64)> = sqlx::query_as(
            r#"
            SELECT s.name, s.code,
                   COUNT(*) FILTER (WHERE a.status = $2) AS present,
                   COUNT(*) AS total
            FROM attendance a
            JOIN subjects s ON a.subject_id = s.id
            WHERE a.student_id = $1
            GROUP BY s.id, s.name, s.code
            "#,
        )
        .bind(student_id)
        .bind(PRESENT)
        .fetch_all(self.pool)
        .await?;

        let mut seen = HashSet::new();
        let shared: HashSet<String> = rows
            .iter()
            .filter(|(name, ..)| !seen.insert(name.as_str()))
            .map(|(name, ..)| name.clone())
            .collect();

        Ok(rows
            .into_iter()
            .map(|(name, code, present, total)| {
                let key = if shared.contains(&name) {
                    format!("{name} ({code})")
                } else {
                    name
                };
                (key, attendance_percentage(present, total))
            })
            .collect())
    }
}

//! Dashboard aggregates

use sqlx::{FromRow, PgPool};

use crate::db::errors::Result;

/// Entity totals gathered in a single statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct DashboardCounts {
    pub total_students: i64,
    pub total_subjects: i64,
    /// Distinct courses offered by the subject catalogue
    pub total_courses: i64,
    pub total_marks: i64,
    pub total_attendance: i64,
}

pub struct DashboardRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn counts(&self) -> Result<DashboardCounts> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM students) AS total_students,
                (SELECT COUNT(*) FROM subjects) AS total_subjects,
                (SELECT COUNT(DISTINCT course) FROM subjects) AS total_courses,
                (SELECT COUNT(*) FROM marks) AS total_marks,
                (SELECT COUNT(*) FROM attendance) AS total_attendance
            "#,
        )
        .fetch_one(self.pool)
        .await?;
        Ok(counts)
    }
}

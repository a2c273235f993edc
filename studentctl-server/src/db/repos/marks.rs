//! Marks repository
//!
//! Every read joins the subject; the admin list also joins the student.
//! Ordering is most recent exam first, undated entries last.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::db::errors::Result;
use crate::models::dates::timestamp;
use crate::models::{percentage, NewMarks, Score};

/// Marks entry with its subject name and code
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksWithSubject {
    pub id: i32,
    pub student_id: i32,
    pub subject_id: i32,
    pub marks_obtained: f64,
    pub total_marks: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub subject_name: String,
    pub subject_code: String,
}

impl MarksWithSubject {
    pub fn percentage(&self) -> f64 {
        percentage(self.marks_obtained, self.total_marks)
    }
}

/// Marks entry for the administrator list, with the student's name
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub marks: MarksWithSubject,
    pub student_name: String,
}

const MARKS_COLUMNS: &str = r#"
    m.id, m.student_id, m.subject_id, m.marks_obtained, m.total_marks,
    m.exam_type, m.exam_date, m.created_at, m.updated_at,
    s.name AS subject_name, s.code AS subject_code
"#;

/// Marks repository
pub struct MarksRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> MarksRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a marks entry and return its id.
    pub async fn create(&self, marks: &NewMarks, now: DateTime<Utc>) -> Result<i32> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO marks
                (student_id, subject_id, marks_obtained, total_marks, exam_type, exam_date,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id
            "#,
        )
        .bind(marks.student_id)
        .bind(marks.subject_id)
        .bind(marks.score.marks_obtained)
        .bind(marks.score.total_marks)
        .bind(&marks.score.exam_type)
        .bind(marks.score.exam_date)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(id, student_id = marks.student_id, subject_id = marks.subject_id, "Marks created");
        Ok(id)
    }

    /// Overwrite the score fields; the student and subject never change.
    pub async fn update(&self, id: i32, score: &Score, now: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE marks SET
                marks_obtained = $2,
                total_marks = $3,
                exam_type = $4,
                exam_date = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(score.marks_obtained)
        .bind(score.total_marks)
        .bind(&score.exam_type)
        .bind(score.exam_date)
        .bind(now)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM marks WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get(&self, id: i32) -> Result<Option<MarksWithSubject>> {
        let marks = sqlx::query_as::<_, MarksWithSubject>(&format!(
            r#"
            SELECT {MARKS_COLUMNS}
            FROM marks m
            JOIN subjects s ON m.subject_id = s.id
            WHERE m.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(marks)
    }

    /// All marks with student and subject names.
    pub async fn list(&self) -> Result<Vec<MarksWithNames>> {
        let marks = sqlx::query_as::<_, MarksWithNames>(&format!(
            r#"
            SELECT {MARKS_COLUMNS}, st.name AS student_name
            FROM marks m
            JOIN students st ON m.student_id = st.id
            JOIN subjects s ON m.subject_id = s.id
            ORDER BY m.exam_date DESC NULLS LAST, m.id DESC
            "#
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(marks)
    }

    pub async fn list_for_student(&self, student_id: i32) -> Result<Vec<MarksWithSubject>> {
        let marks = sqlx::query_as::<_, MarksWithSubject>(&format!(
            r#"
            SELECT {MARKS_COLUMNS}
            FROM marks m
            JOIN subjects s ON m.subject_id = s.id
            WHERE m.student_id = $1
            ORDER BY m.exam_date DESC NULLS LAST, m.id DESC
            "#
        ))
        .bind(student_id)
        .fetch_all(self.pool)
        .await?;
        Ok(marks)
    }

    pub async fn list_for_student_and_subject(
        &self,
        student_id: i32,
        subject_id: i32,
    ) -> Result<Vec<MarksWithSubject>> {
        let marks = sqlx::query_as::<_, MarksWithSubject>(&format!(
            r#"
            SELECT {MARKS_COLUMNS}
            FROM marks m
            JOIN subjects s ON m.subject_id = s.id
            WHERE m.student_id = $1 AND m.subject_id = $2
            ORDER BY m.exam_date DESC NULLS LAST, m.id DESC
            "#
        ))
        .bind(student_id)
        .bind(subject_id)
        .fetch_all(self.pool)
        .await?;
        Ok(marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::test_support::migrated;
    use crate::db::repos::students::test_support::{new_student, unique_email};
    use crate::db::{DbError, StudentRepo, SubjectRepo};

    fn score(obtained: f64, exam_date: Option<NaiveDate>) -> Score {
        Score {
            marks_obtained: obtained,
            total_marks: 100.0,
            exam_type: Some("Midterm".into()),
            exam_date,
        }
    }

    #[test]
    fn percentage_of_row() {
        let row = MarksWithSubject {
            id: 1,
            student_id: 1,
            subject_id: 1,
            marks_obtained: 25.0,
            total_marks: 50.0,
            exam_type: None,
            exam_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            subject_name: "Calculus".into(),
            subject_code: "MA101".into(),
        };
        assert_eq!(row.percentage(), 50.0);
    }

    #[test]
    fn names_row_serializes_flat() {
        let row = MarksWithNames {
            marks: MarksWithSubject {
                id: 7,
                student_id: 2,
                subject_id: 3,
                marks_obtained: 40.0,
                total_marks: 50.0,
                exam_type: None,
                exam_date: NaiveDate::from_ymd_opt(2024, 3, 1),
                created_at: Utc::now(),
                updated_at: Utc::now(),
                subject_name: "Genetics".into(),
                subject_code: "BI102".into(),
            },
            student_name: "Ravi".into(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["studentName"], "Ravi");
        assert_eq!(json["subjectCode"], "BI102");
        assert_eq!(json["examDate"], "2024-03-01");
        assert!(json.get("examType").is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_update_delete_cycle() {
        let db = migrated().await;
        let student = StudentRepo::new(db.pool())
            .create(&new_student(&unique_email("marks")), "hash", Utc::now())
            .await
            .unwrap();
        let subject = SubjectRepo::new(db.pool()).list().await.unwrap().remove(0);
        let repo = MarksRepo::new(db.pool());

        let older = NaiveDate::from_ymd_opt(2024, 1, 10);
        let newer = NaiveDate::from_ymd_opt(2024, 5, 10);
        let first = repo
            .create(
                &NewMarks { student_id: student.id, subject_id: subject.id, score: score(60.0, older) },
                Utc::now(),
            )
            .await
            .unwrap();
        let second = repo
            .create(
                &NewMarks { student_id: student.id, subject_id: subject.id, score: score(75.0, newer) },
                Utc::now(),
            )
            .await
            .unwrap();

        let listed = repo.list_for_student(student.id).await.unwrap();
        assert_eq!(listed.iter().map(|m| m.id).collect::<Vec<_>>(), vec![second, first]);
        assert_eq!(listed[0].subject_code, subject.code);

        assert!(repo.update(first, &score(90.0, older), Utc::now()).await.unwrap());
        assert_eq!(repo.get(first).await.unwrap().unwrap().marks_obtained, 90.0);
        assert!(!repo.update(i32::MAX, &score(1.0, None), Utc::now()).await.unwrap());

        assert!(repo.delete(first).await.unwrap());
        assert!(!repo.delete(first).await.unwrap());
        assert_eq!(
            repo.list_for_student_and_subject(student.id, subject.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_student_is_foreign_key_violation() {
        let db = migrated().await;
        let subject = SubjectRepo::new(db.pool()).list().await.unwrap().remove(0);
        let err = MarksRepo::new(db.pool())
            .create(
                &NewMarks { student_id: i32::MAX, subject_id: subject.id, score: score(1.0, None) },
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}

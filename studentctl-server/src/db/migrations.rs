//! Schema migrations
//!
//! Idempotent: every statement uses `IF NOT EXISTS` or `ON CONFLICT`. The
//! whole run holds a transaction-scoped advisory lock, so instances starting
//! together apply the schema one at a time.

use sqlx::{PgConnection, PgPool};

use super::errors::Result;

/// Subjects offered per course, seeded on first run.
const SUBJECT_CATALOGUE: &[(&str, &str, &str)] = &[
    ("Data Structures", "CS101", "Computer Science"),
    ("Database Systems", "CS102", "Computer Science"),
    ("Operating Systems", "CS103", "Computer Science"),
    ("Calculus", "MA101", "Mathematics"),
    ("Linear Algebra", "MA102", "Mathematics"),
    ("Classical Mechanics", "PH101", "Physics"),
    ("Electromagnetism", "PH102", "Physics"),
    ("Organic Chemistry", "CH101", "Chemistry"),
    ("Physical Chemistry", "CH102", "Chemistry"),
    ("Cell Biology", "BI101", "Biology"),
    ("Genetics", "BI102", "Biology"),
    ("Engineering Mechanics", "EN101", "Engineering"),
    ("Thermodynamics", "EN102", "Engineering"),
    ("Principles of Management", "BU101", "Business"),
    ("Financial Accounting", "BU102", "Business"),
    ("Art History", "AR101", "Arts"),
    ("Drawing Fundamentals", "AR102", "Arts"),
];

/// Advisory lock key serializing concurrent migration runs.
const MIGRATION_LOCK_KEY: i64 = 0x5354_5544_454e_5453;

/// Run all migrations and seed the subject catalogue.
pub async fn run(pool: &PgPool) -> Result<()> {
    tracing::info!("Running migrations...");

    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    apply(&mut *tx).await?;
    seed_subjects(&mut *tx).await?;
    tx.commit().await?;

    tracing::info!("Migrations complete");
    Ok(())
}

async fn apply(conn: &mut PgConnection) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            course TEXT NOT NULL,
            gender TEXT,
            dob DATE,
            city TEXT,
            password TEXT NOT NULL,
            roll_number TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            CONSTRAINT students_email_key UNIQUE (email),
            CONSTRAINT students_roll_number_key UNIQUE (roll_number)
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT NOT NULL,
            course TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            CONSTRAINT subjects_code_key UNIQUE (code)
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS marks (
            id SERIAL PRIMARY KEY,
            student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            subject_id INTEGER NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
            marks_obtained DOUBLE PRECISION NOT NULL CHECK (marks_obtained >= 0),
            total_marks DOUBLE PRECISION NOT NULL CHECK (total_marks > 0),
            exam_type TEXT,
            exam_date DATE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id SERIAL PRIMARY KEY,
            student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            subject_id INTEGER NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
            attendance_date DATE NOT NULL,
            status TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            CONSTRAINT attendance_student_subject_date_key
                UNIQUE (student_id, subject_id, attendance_date)
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    // Indexes for per-student lookups
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_marks_student ON marks(student_id)")
        .execute(&mut *conn)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_attendance_student ON attendance(student_id)")
        .execute(&mut *conn)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_created ON students(created_at DESC)")
        .execute(&mut *conn)
        .await?;

    Ok(())
}

async fn seed_subjects(conn: &mut PgConnection) -> Result<()> {
    let names: Vec<&str> = SUBJECT_CATALOGUE.iter().map(|(name, _, _)| *name).collect();
    let codes: Vec<&str> = SUBJECT_CATALOGUE.iter().map(|(_, code, _)| *code).collect();
    let courses: Vec<&str> = SUBJECT_CATALOGUE.iter().map(|(_, _, course)| *course).collect();

    let seeded = sqlx::query(
        r#"
        INSERT INTO subjects (name, code, course, created_at)
        SELECT name, code, course, NOW()
        FROM UNNEST($1::text[], $2::text[], $3::text[]) AS catalogue(name, code, course)
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .bind(&names)
    .bind(&codes)
    .bind(&courses)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if seeded > 0 {
        tracing::info!(count = seeded, "Seeded subject catalogue");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_codes_are_unique() {
        let codes: HashSet<_> = SUBJECT_CATALOGUE.iter().map(|(_, code, _)| code).collect();
        assert_eq!(codes.len(), SUBJECT_CATALOGUE.len());
    }

    #[test]
    fn catalogue_covers_every_course() {
        let courses: HashSet<_> = SUBJECT_CATALOGUE
            .iter()
            .map(|(_, _, course)| *course)
            .collect();
        assert_eq!(courses.len(), 8);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_are_idempotent() {
        let db = crate::db::pool::test_support::migrated().await;
        run(db.pool()).await.expect("second run failed");

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subjects WHERE code = 'CS101'")
            .fetch_one(db.pool())
            .await
            .expect("count failed");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_runs_do_not_race() {
        let db = crate::db::pool::test_support::connect().await;
        let (first, second) = tokio::join!(run(db.pool()), run(db.pool()));
        first.expect("first run failed");
        second.expect("second run failed");
    }
}

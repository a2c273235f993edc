//! Repository implementations for database access
//!
//! Each repository borrows the pool and issues one parameterized statement
//! per call. Rows map onto a distinct type per projection.

pub mod attendance;
pub mod dashboard;
pub mod marks;
pub mod students;
pub mod subjects;

pub use attendance::{AttendanceRepo, AttendanceWithNames, AttendanceWithSubject};
pub use dashboard::{DashboardCounts, DashboardRepo};
pub use marks::{MarksRepo, MarksWithNames, MarksWithSubject};
pub use students::{Student, StudentCredentials, StudentRepo, StudentSummary};
pub use subjects::{Subject, SubjectRepo};

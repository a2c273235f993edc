//! Request models with validation at construction
//!
//! All client input is validated when converting into these types.
//! Invalid input returns ValidationError, not panic.

pub mod attendance;
pub mod dates;
pub mod lenient;
pub mod marks;
pub mod student;
pub mod validation;

pub use attendance::{attendance_percentage, AttendanceInput, NewAttendance, PRESENT};
pub use marks::{percentage, MarksInput, NewMarks, Score};
pub use student::{Email, NewStudent, Phone, StudentInput, DEFAULT_PASSWORD};
pub use validation::ValidationError;

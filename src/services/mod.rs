pub mod editor;
pub mod grader;

pub use grader::{grade_week, grade_week_with, GradeReport, PickAction, PickOutcome};

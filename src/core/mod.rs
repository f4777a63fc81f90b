pub mod course;
pub mod curriculum;
pub mod table;

pub use course::{CourseCode, CourseRecord, RequirementKind};
pub use curriculum::{Curriculum, Selection};

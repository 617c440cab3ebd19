pub mod json_resume;
pub mod resume;

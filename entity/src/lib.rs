pub mod departments;
pub mod employee_skills;
pub mod employees;
pub mod goals;
pub mod review_cycles;
pub mod review_templates;
pub mod reviews;
pub mod skills;
pub mod users;

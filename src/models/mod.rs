pub mod feedback;
pub mod project;
pub mod refinement;
pub mod section;
pub mod user;

pub mod auth_handlers;
pub mod export_handlers;
pub mod project_handlers;
pub mod section_handlers;
pub mod theme_handlers;

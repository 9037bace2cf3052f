pub mod format_service;
pub mod refresh_service;
pub mod sort_service;
pub mod table_service;

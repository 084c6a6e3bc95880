pub mod config;
pub mod fetch;
pub mod insights;
pub mod table;

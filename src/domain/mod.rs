pub mod crm;
pub mod error;
pub mod llm_config;

// CSV import pipeline types
pub mod import;

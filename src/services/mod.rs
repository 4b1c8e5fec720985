pub mod backend;
pub mod catalog_writer;
pub mod llm_service;
pub mod payload_extractor;
pub mod payload_validator;
pub mod prompt_builder;
pub mod run_log_writer;

pub use backend::{GenerationBackend, GenerationRequest};
pub use catalog_writer::CatalogWriter;
pub use llm_service::LlmService;
pub use payload_extractor::extract_json_list;
pub use payload_validator::{validate_payload, validate_records_schema, ValidationOutcome};
pub use prompt_builder::build_generation_prompt;
pub use run_log_writer::RunLogWriter;

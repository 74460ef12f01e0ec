pub mod extract_service;
pub mod llm_service;

pub use extract_service::{DocumentKind, ExtractService};
pub use llm_service::LlmService;

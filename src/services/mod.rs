pub mod analysis_service;
pub mod export_service;
pub mod model_selector;
pub mod openai_client;
pub mod output_schema;
pub mod question_editor;
pub mod question_generation_service;
pub mod structured_output;
pub mod workspace;

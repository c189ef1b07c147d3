pub mod analysis_handler;
pub mod graphql_handler;
pub mod question_handler;
pub mod system_handler;

pub use analysis_handler::analyze_content;
pub use graphql_handler::{graphiql, graphql};
pub use question_handler::{
    delete_question, export_gift, export_json, generate_questions, list_questions,
};
pub use system_handler::{health_check, list_models, select_model};

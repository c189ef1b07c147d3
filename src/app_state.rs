use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        openai_client::OpenAiStructuredClient, structured_output::StructuredOutputClient,
        workspace::WorkspaceService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<WorkspaceService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = Arc::new(OpenAiStructuredClient::new(&config));
        Self::with_client(config, client)
    }

    /// Wires the services around any structured-output client.
    pub fn with_client(config: Config, client: Arc<dyn StructuredOutputClient>) -> Self {
        let workspace = Arc::new(WorkspaceService::new(client, config.default_model));

        Self {
            workspace,
            config: Arc::new(config),
        }
    }
}

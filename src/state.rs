use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::{Config, GradingStrategy},
    error::ConfigError,
    models::criteria::CriteriaStore,
    services::{
        completion::OpenAiClient,
        scorer::{DelegatedScorer, LocalScorer, Scorer},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub criteria: Arc<CriteriaStore>,
    pub scorer: Arc<dyn Scorer>,
}

impl AppState {
    pub fn new(config: Config, criteria: CriteriaStore, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            config,
            criteria: Arc::new(criteria),
            scorer,
        }
    }

    /// Builds the criteria table and the configured scorer.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let criteria = match &config.criteria_file {
            Some(path) => {
                let store = CriteriaStore::from_json_file(path)?;
                tracing::info!("Loaded {} grading criteria from {}", store.len(), path);
                store
            }
            None => CriteriaStore::builtin(),
        };

        let scorer: Arc<dyn Scorer> = match config.strategy {
            GradingStrategy::Local => Arc::new(LocalScorer),
            GradingStrategy::Delegated => {
                let client = OpenAiClient::new(config.completion.clone())?;
                if !client.has_credential() {
                    // Not fatal: every delegated grading degrades until a key is provided.
                    tracing::warn!(
                        "OPENAI_API_KEY is not set; every response will be graded as \"Error in grading\""
                    );
                }
                tracing::info!("Delegating grading to {}", client.endpoint());
                Arc::new(DelegatedScorer::new(Arc::new(client)))
            }
        };

        Ok(Self::new(config, criteria, scorer))
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<CriteriaStore> {
    fn from_ref(state: &AppState) -> Self {
        state.criteria.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Scorer> {
    fn from_ref(state: &AppState) -> Self {
        state.scorer.clone()
    }
}

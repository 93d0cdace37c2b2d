//! Shared application state for the web server.

use std::sync::Arc;
use std::time::Duration;

use drugscope_analysis::Orchestrator;
use drugscope_common::{RetryPolicy, SandboxClient};
use drugscope_db::HistoryStore;
use drugscope_predict::{HttpPredictionBackend, PredictionClient};
use drugscope_registry::{PubChemClient, RegistryResolver};

use crate::config::Config;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Wire the PubChem and prediction clients from `config` around an
    /// already-opened history store.
    pub fn from_config(config: &Config, history: Arc<dyn HistoryStore>) -> anyhow::Result<Self> {
        let retry = RetryPolicy::linear(config.retry.max_attempts, config.retry.base_delay());

        let pubchem_http = SandboxClient::new(Duration::from_secs(config.registry.timeout_secs))?
            .with_base_url(&config.registry.base_url)?;
        let pubchem = PubChemClient::with_base_url(pubchem_http, &config.registry.base_url);

        let backend_http = SandboxClient::new(Duration::from_secs(config.prediction.timeout_secs))?;
        let backend = HttpPredictionBackend::new(&config.prediction.base_url, backend_http)?;

        let orchestrator = Orchestrator::new(
            RegistryResolver::new(Arc::new(pubchem), retry.clone()),
            PredictionClient::new(Arc::new(backend), retry),
            history,
        );
        Ok(Self::new(orchestrator))
    }
}

pub type SharedState = Arc<AppState>;

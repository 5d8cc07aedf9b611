//! Application state

use sentinel_core::{ChatAdvisor, CleanupExecutor, CleanupSimulator, DeletionAdvisor, Result};
use sentinel_store::{ActionLog, RecommendationBook, ServerStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;

/// Shared application state
///
/// This struct implements Clone to allow it to be used as Axum state
/// All fields are wrapped in Arc for efficient cloning
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub servers: Arc<RwLock<ServerStore>>,
    pub recommendations: Arc<RwLock<RecommendationBook>>,
    pub log: Arc<RwLock<ActionLog>>,
    pub executor: Arc<dyn CleanupExecutor>,
    pub advisor: Option<Arc<dyn DeletionAdvisor>>,
}

impl AppState {
    /// Create new application state, loading the server inventory
    pub async fn new(config: Config) -> Result<Self> {
        let mut store = ServerStore::load(&config.data_path).await?;
        store.refresh_statuses(&mut rand::thread_rng(), &config.cleanup.offline_address);

        let executor = Arc::new(CleanupSimulator::new(config.cleanup.clone()));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.advisor.timeout_secs))
            .build()?;
        let advisor = ChatAdvisor::from_config(client, &config.advisor)
            .map(|a| Arc::new(a) as Arc<dyn DeletionAdvisor>);
        if advisor.is_some() {
            info!(model = %config.advisor.model, "Deletion advisor enabled");
        } else {
            info!("Deletion advisor disabled (ADVISOR_API_KEY not set)");
        }

        Ok(Self::from_parts(config, store, executor, advisor))
    }

    /// Assemble state from already-built components
    pub fn from_parts(
        config: Config,
        store: ServerStore,
        executor: Arc<dyn CleanupExecutor>,
        advisor: Option<Arc<dyn DeletionAdvisor>>,
    ) -> Self {
        let log = ActionLog::new(config.log_capacity);

        Self {
            config: Arc::new(config),
            servers: Arc::new(RwLock::new(store)),
            recommendations: Arc::new(RwLock::new(RecommendationBook::seeded())),
            log: Arc::new(RwLock::new(log)),
            executor,
            advisor,
        }
    }

    /// Name of the inventory server with the given address, if any
    pub async fn server_name_for(&self, address: &str) -> Option<String> {
        self.servers
            .read()
            .await
            .list()
            .iter()
            .find(|s| s.ip_address == address)
            .map(|s| s.name.clone())
    }
}

use crate::config::Config;
use crate::upstream::{HttpTransport, PlatformClient};
use std::sync::Arc;

/// Application context containing shared dependencies
///
/// Both members are immutable after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub platform: Arc<PlatformClient>,
}

impl AppContext {
    /// Creates a new application context
    pub fn new(config: Arc<Config>, platform: Arc<PlatformClient>) -> Self {
        Self { config, platform }
    }

    /// Build the production context: the platform client talks HTTP to the
    /// configured GraphQL endpoint
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(&config.upstream)?;
        let platform = PlatformClient::new(Arc::new(transport));
        Ok(Self::new(Arc::new(config), Arc::new(platform)))
    }
}

// Application state module
// Everything a request needs, shared read-only across connections

use crate::assets::AssetRegistry;
use crate::error::AssetError;
use crate::handler::Router;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    /// Bind every asset of the registry to a responder using the configured
    /// cache policy
    pub fn new(config: Config, registry: &AssetRegistry) -> Result<Self, AssetError> {
        let router = Router::new(registry, config.http.cache_policy())?;
        Ok(Self { config, router })
    }
}

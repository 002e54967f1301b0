use std::sync::Arc;

use crate::auth::IdentityCodec;
use crate::build_info::BuildInfo;
use crate::config::AppConfig;
use crate::database::ProductRepository;
use crate::middleware::TokenSource;
use crate::services::{CatalogService, ProductService};

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductService>,
    pub store: Arc<dyn ProductRepository>,
    pub codec: IdentityCodec,
    pub token_source: TokenSource,
    pub admin_role: Option<String>,
    pub build_info: Arc<BuildInfo>,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn ProductRepository>) -> Self {
        Self {
            products: Arc::new(CatalogService::new(store.clone())),
            store,
            codec: IdentityCodec::from_config(&config.jwt),
            token_source: TokenSource::from_config(&config.jwt),
            admin_role: config.authorization.admin_role.clone(),
            build_info: Arc::new(BuildInfo::from_build_env()),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State over an in-memory store, configured from `vars` plus a signing key.
    pub(crate) fn for_tests(vars: &[(&str, &str)]) -> Self {
        let mut all = vec![
            ("JWT_SIGNING_KEY".to_string(), "unit-test-key".to_string()),
            ("DATABASE_URL".to_string(), "postgres://unused@localhost/unused".to_string()),
        ];
        all.extend(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        let config = AppConfig::from_lookup(|key| {
            all.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap();
        Self::new(&config, Arc::new(crate::database::InMemoryProductRepository::new()))
    }
}

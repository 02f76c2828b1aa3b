//! Backing services for the HTTP layer.

use std::sync::Arc;

use lossdesk_auth::{Directory, Hs256Tokens};
use lossdesk_store::Store;

use crate::config::ApiConfig;

pub struct AppServices {
    pub store: Store,
    pub directory: Directory,
    pub tokens: Arc<Hs256Tokens>,
}

pub fn build_services(config: &ApiConfig) -> AppServices {
    let directory = Directory::new();
    directory.provision_all(config.accounts.iter().cloned());
    tracing::info!(accounts = directory.len(), "account directory provisioned");

    AppServices {
        store: Store::new(),
        directory,
        tokens: Arc::new(Hs256Tokens::new(
            config.jwt_secret.as_bytes(),
            config.access_ttl,
            config.refresh_ttl,
        )),
    }
}

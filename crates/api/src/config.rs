//! Environment-driven configuration.

use anyhow::Context;
use chrono::Duration;

use lossdesk_auth::{AccountSeed, Role};

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Accounts provisioned into the directory at startup.
    pub accounts: Vec<AccountSeed>,
}

impl ApiConfig {
    /// Read configuration from the environment.
    ///
    /// `LOSSDESK_ACCOUNTS` points at a JSON array of account seeds; without
    /// it the process provisions a dev admin account and warns.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("LOSSDESK_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let access_ttl = ttl_from_env("LOSSDESK_ACCESS_TTL_SECS", 15 * 60)?;
        let refresh_ttl = ttl_from_env("LOSSDESK_REFRESH_TTL_SECS", 24 * 60 * 60)?;

        let accounts = match std::env::var("LOSSDESK_ACCOUNTS") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read account seed file {path}"))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse account seed file {path}"))?
            }
            Err(_) => {
                tracing::warn!("LOSSDESK_ACCOUNTS not set; provisioning insecure dev admin account");
                dev_accounts()
            }
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            access_ttl,
            refresh_ttl,
            accounts,
        })
    }
}

fn ttl_from_env(var: &str, default_secs: i64) -> anyhow::Result<Duration> {
    match std::env::var(var) {
        Ok(raw) => {
            let secs: i64 = raw.parse().with_context(|| format!("{var} must be an integer"))?;
            Ok(Duration::seconds(secs))
        }
        Err(_) => Ok(Duration::seconds(default_secs)),
    }
}

fn dev_accounts() -> Vec<AccountSeed> {
    vec![AccountSeed {
        username: "admin".to_string(),
        password: "admin".to_string(),
        roles: vec![Role::Admin],
        superuser: true,
        active: true,
    }]
}

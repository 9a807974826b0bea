use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub store_url: String,
    pub store_key: String,
    pub webhook_save: String,
    pub webhook_edit: String,
    pub webhook_status: String,
    pub webhook_login: String,
    pub webhook_logout: String,
    pub webhook_metrics: String,
    pub poll_limit: usize,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("SMO_PORT", "8900"),
            store_url: try_load("SMO_STORE_URL", "http://localhost:54321"),
            store_key: read_secret("SMO_STORE_KEY"),
            webhook_save: try_load("SMO_WEBHOOK_SAVE", "http://localhost:5678/webhook/smo-cadastro"),
            webhook_edit: try_load("SMO_WEBHOOK_EDIT", "http://localhost:5678/webhook/smo-edicao"),
            webhook_status: try_load(
                "SMO_WEBHOOK_STATUS",
                "http://localhost:5678/webhook/smo-status",
            ),
            webhook_login: try_load("SMO_WEBHOOK_LOGIN", "http://localhost:5678/webhook/smo-login"),
            webhook_logout: try_load(
                "SMO_WEBHOOK_LOGOUT",
                "http://localhost:5678/webhook/smo-logoff",
            ),
            webhook_metrics: try_load(
                "SMO_WEBHOOK_METRICS",
                "http://localhost:5678/webhook/smo-metricas",
            ),
            poll_limit: try_load("SMO_POLL_LIMIT", "100"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn read_secret(secret_name: &str) -> String {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .expect("Secrets misconfigured!")
}

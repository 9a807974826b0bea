use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use store::Store;
use tokio::task::JoinHandle;

use super::{config::Config, manifest::Manifest, metrics::MetricsSink};

#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub token: String,
}

pub struct State {
    pub config: Config,
    pub store: Store,
    pub webhooks: Client,
    pub metrics: MetricsSink,
    manifests: RwLock<Vec<Manifest>>,
    next_id: RwLock<String>,
    session: RwLock<Option<Session>>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        let store = Store::new(&config.store_url, &config.store_key);
        let webhooks = Client::new();
        let metrics = MetricsSink::spawn(config.webhook_metrics.clone(), webhooks.clone());

        Arc::new(Self {
            config,
            store,
            webhooks,
            metrics,
            manifests: RwLock::new(Vec::new()),
            next_id: RwLock::new(String::new()),
            session: RwLock::new(None),
            poller: Mutex::new(None),
        })
    }

    /// Wholesale replacement: whichever response is processed last wins,
    /// regardless of request order. No merging.
    pub fn replace_manifests(&self, manifests: Vec<Manifest>) {
        *self.manifests.write() = manifests;
    }

    pub fn manifests_snapshot(&self) -> Vec<Manifest> {
        self.manifests.read().clone()
    }

    pub fn set_next_id(&self, id: String) {
        *self.next_id.write() = id;
    }

    pub fn next_id(&self) -> String {
        self.next_id.read().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn install_session(&self, session: Session) {
        *self.session.write() = Some(session);
    }

    pub fn set_poller(&self, handle: JoinHandle<()>) {
        if let Some(previous) = self.poller.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Teardown on logout or detected session conflict: the periodic timer
    /// dies with the task; responses already in flight are never applied.
    pub fn clear_session(&self) {
        *self.session.write() = None;

        if let Some(handle) = self.poller.lock().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, State};
    use crate::config::Config;
    use crate::manifest::Manifest;

    fn test_config() -> Config {
        Config {
            port: 0,
            store_url: "http://localhost:54321".to_string(),
            store_key: "test-key".to_string(),
            webhook_save: "http://localhost:5678/webhook/smo-cadastro".to_string(),
            webhook_edit: "http://localhost:5678/webhook/smo-edicao".to_string(),
            webhook_status: "http://localhost:5678/webhook/smo-status".to_string(),
            webhook_login: "http://localhost:5678/webhook/smo-login".to_string(),
            webhook_logout: "http://localhost:5678/webhook/smo-logoff".to_string(),
            webhook_metrics: "http://localhost:5678/webhook/smo-metricas".to_string(),
            poll_limit: 100,
        }
    }

    fn manifest(id: &str) -> Manifest {
        Manifest {
            manifesto: id.to_string(),
            ..Manifest::default()
        }
    }

    #[tokio::test]
    async fn test_last_processed_response_wins() {
        let state = State::new(test_config());

        // Two overlapping polls: the one requested first arrives last.
        let second_request = vec![manifest("MAO-250000002")];
        let first_request = vec![manifest("MAO-250000001")];

        state.replace_manifests(second_request);
        state.replace_manifests(first_request);

        let snapshot = state.manifests_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].manifesto, "MAO-250000001");
    }

    #[tokio::test]
    async fn test_clear_session_drops_identity() {
        let state = State::new(test_config());

        state.install_session(Session {
            user: "maria".to_string(),
            token: "abc".to_string(),
        });
        assert!(state.session().is_some());

        state.clear_session();
        assert!(state.session().is_none());
    }
}

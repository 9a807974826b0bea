//! # Metrics
//!
//! Fire-and-forget action counters.
//!
//! Completed actions push an event onto an unbounded queue; a drain task
//! posts one increment per event to the metrics webhook. The queue is the
//! only coupling between actions and the sink — a slow or dead metrics
//! endpoint never blocks or fails the action that produced the event.

use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Cadastro,
    Edicao,
    Cancelamento,
    Anulacao,
    Entrega,
    Login,
    Logoff,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Cadastro => "cadastro",
            ActionKind::Edicao => "edicao",
            ActionKind::Cancelamento => "cancelamento",
            ActionKind::Anulacao => "anulacao",
            ActionKind::Entrega => "entrega",
            ActionKind::Login => "login",
            ActionKind::Logoff => "logoff",
        }
    }
}

pub struct MetricsSink {
    sender: UnboundedSender<ActionKind>,
}

impl MetricsSink {
    pub fn new() -> (Self, UnboundedReceiver<ActionKind>) {
        let (sender, receiver) = unbounded_channel();

        (Self { sender }, receiver)
    }

    pub fn spawn(endpoint: String, client: Client) -> Self {
        let (sink, receiver) = Self::new();

        tokio::spawn(drain(receiver, endpoint, client));

        sink
    }

    /// Never blocks; a closed queue only drops the event.
    pub fn record(&self, kind: ActionKind) {
        if self.sender.send(kind).is_err() {
            warn!("Metrics queue closed, dropping {}", kind.as_str());
        }
    }
}

async fn drain(mut receiver: UnboundedReceiver<ActionKind>, endpoint: String, client: Client) {
    while let Some(kind) = receiver.recv().await {
        let payload = json!({
            "metrica": kind.as_str(),
            "incremento": 1,
        });

        match client.post(&endpoint).json(&payload).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(
                    "Metrics increment {} refused with status {}",
                    kind.as_str(),
                    response.status()
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Metrics increment {} failed: {e}", kind.as_str()),
        }
    }
}

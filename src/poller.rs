//! # Poller
//!
//! Fixed 1-second refresh loop, alive while a session is.
//!
//! Every tick fires two independent reads: the recent-row snapshot and the
//! identifier sample feeding the sequence derivation. Ticks are not
//! serialized against in-flight requests — a slow response may land after
//! a newer one, and each response replaces the cache wholesale, so the
//! last one processed wins. Failed reads are logged and skipped; the cache
//! keeps its last-known-good content until the next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde_json::Value;
use tokio::{task::JoinHandle, time::interval};
use tracing::warn;

use crate::manifest::{CARIMBO_FIELD, MANIFEST_ID_FIELD, MANIFEST_TABLE, Manifest};
use crate::sequence::{SEQUENCE_SAMPLE, resolve_next_id, year_prefix};
use crate::state::State;

pub const POLL_PERIOD_MS: u64 = 1000;

pub fn spawn(state: Arc<State>) -> JoinHandle<()> {
    tokio::spawn(run(state))
}

async fn run(state: Arc<State>) {
    let mut tick = interval(Duration::from_millis(POLL_PERIOD_MS));

    loop {
        tick.tick().await;

        tokio::spawn(refresh_manifests(state.clone()));
        tokio::spawn(refresh_next_id(state.clone()));
    }
}

pub async fn refresh_manifests(state: Arc<State>) {
    let rows: Result<Vec<Value>, _> = state
        .store
        .list_recent(MANIFEST_TABLE, CARIMBO_FIELD, true, state.config.poll_limit)
        .await;

    match rows {
        Ok(rows) => {
            state.replace_manifests(rows.iter().map(Manifest::from_row).collect());
        }
        Err(e) => warn!("Manifest refresh failed: {e}"),
    }
}

pub async fn refresh_next_id(state: Arc<State>) {
    let prefix = year_prefix(Local::now().date_naive());

    let remote = state
        .store
        .list_ids_like(MANIFEST_TABLE, MANIFEST_ID_FIELD, &prefix, SEQUENCE_SAMPLE)
        .await;

    let cached = state.manifests_snapshot();
    state.set_next_id(resolve_next_id(&prefix, remote, &cached));
}

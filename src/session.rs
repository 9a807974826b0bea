//! # Sessão
//!
//! Duplicate-session guard.
//!
//! The backend holds exactly one token per user; a newer login overwrites
//! it. Probes compare the locally held token against the stored one and
//! force a logout on mismatch — detection is pull-based, so the lag is
//! bounded by how often the frontend probes (focus, click, visibility)
//! plus the mandatory check before every write.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{error::AppError, state::State};

pub async fn verify(state: &Arc<State>) -> Result<(), AppError> {
    let Some(session) = state.session() else {
        return Err(AppError::NotAuthenticated);
    };

    match state.store.session_token(&session.user).await {
        Ok(Some(token)) if token == session.token => Ok(()),
        Ok(_) => {
            info!("Session for {} superseded, forcing logout", session.user);
            state.clear_session();

            Err(AppError::SessionConflict)
        }
        Err(e) => {
            // Transient read failure is not a conflict; the next probe
            // re-checks.
            warn!("Session probe failed: {e}");

            Ok(())
        }
    }
}

//! # Ações
//!
//! Every mutating action is delegated to a workflow webhook that validates
//! and writes server-side; nothing here touches the backend directly.
//!
//! Payloads always carry the acting user (`Usuario_Action`), a
//! `YYYY-MM-DD HH:MM:SS` stamp (`Data_Action`) and the `Action` family.
//! Cancel, annul and deliver share one endpoint keyed by `Action`. A
//! refused or unreachable webhook surfaces once to the caller — no retry,
//! and nothing to roll back since no state was applied optimistically.

use std::sync::Arc;

use chrono::Local;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::error::AppError;
use crate::manifest::{MANIFEST_ID_FIELD, MANIFEST_TABLE, Status};
use crate::metrics::ActionKind;
use crate::poller;
use crate::sequence::{SEQUENCE_SAMPLE, resolve_next_id, year_prefix};
use crate::session;
use crate::shift::classify;
use crate::state::{Session, State};
use crate::utils::{now_stamp, parse_received, sanitize, stamp};

#[derive(Debug, Deserialize)]
pub struct SaveForm {
    pub voo: String,
    pub origem: String,
    pub destino: String,
    #[serde(default)]
    pub companhia: String,
    #[serde(default)]
    pub volumes: u64,
    #[serde(default)]
    pub peso_kg: f64,
    #[serde(default)]
    pub recebido_em: Option<String>,
    #[serde(default)]
    pub observacoes: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub manifesto: String,
    #[serde(default)]
    pub voo: Option<String>,
    #[serde(default)]
    pub origem: Option<String>,
    #[serde(default)]
    pub destino: Option<String>,
    #[serde(default)]
    pub companhia: Option<String>,
    #[serde(default)]
    pub volumes: Option<u64>,
    #[serde(default)]
    pub peso_kg: Option<f64>,
    #[serde(default)]
    pub recebido_em: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub manifesto: String,
    pub action: StatusAction,
    #[serde(default)]
    pub motivo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Cancelamento,
    Anulacao,
    Entrega,
}

impl StatusAction {
    pub fn kind(self) -> ActionKind {
        match self {
            StatusAction::Cancelamento => ActionKind::Cancelamento,
            StatusAction::Anulacao => ActionKind::Anulacao,
            StatusAction::Entrega => ActionKind::Entrega,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub usuario: String,
    pub senha: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

pub async fn save(state: &Arc<State>, form: SaveForm) -> Result<String, AppError> {
    session::verify(state).await?;
    let session = state.session().ok_or(AppError::NotAuthenticated)?;

    if sanitize(&form.voo).is_empty()
        || sanitize(&form.origem).is_empty()
        || sanitize(&form.destino).is_empty()
    {
        return Err(AppError::MalformedPayload);
    }

    // Recomputed against the authoritative sample immediately before the
    // write; the value cached by the poller may be a tick stale.
    let prefix = year_prefix(Local::now().date_naive());
    let remote = state
        .store
        .list_ids_like(MANIFEST_TABLE, MANIFEST_ID_FIELD, &prefix, SEQUENCE_SAMPLE)
        .await;
    let id = resolve_next_id(&prefix, remote, &state.manifests_snapshot());

    let payload = save_payload(&id, &form, &session.user, &now_stamp());
    post_webhook(state, &state.config.webhook_save, &payload).await?;

    info!("Manifest {id} registered by {}", session.user);
    state.metrics.record(ActionKind::Cadastro);

    Ok(id)
}

pub async fn edit(state: &Arc<State>, form: EditForm) -> Result<(), AppError> {
    session::verify(state).await?;
    let session = state.session().ok_or(AppError::NotAuthenticated)?;

    if form.manifesto.trim().is_empty() {
        return Err(AppError::MalformedPayload);
    }

    let payload = edit_payload(&form, &session.user, &now_stamp());
    post_webhook(state, &state.config.webhook_edit, &payload).await?;

    info!("Manifest {} edited by {}", form.manifesto, session.user);
    state.metrics.record(ActionKind::Edicao);

    Ok(())
}

pub async fn status_action(state: &Arc<State>, form: StatusForm) -> Result<(), AppError> {
    session::verify(state).await?;
    let session = state.session().ok_or(AppError::NotAuthenticated)?;

    if form.manifesto.trim().is_empty() {
        return Err(AppError::MalformedPayload);
    }

    let payload = status_payload(&form, &session.user, &now_stamp());
    post_webhook(state, &state.config.webhook_status, &payload).await?;

    info!(
        "Manifest {} {} by {}",
        form.manifesto,
        form.action.kind().as_str(),
        session.user
    );
    state.metrics.record(form.action.kind());

    Ok(())
}

pub async fn login(state: &Arc<State>, form: LoginForm) -> Result<(), AppError> {
    let payload = json!({
        "Usuario": form.usuario,
        "Senha": form.senha,
        "Data_Action": now_stamp(),
        "Action": ActionKind::Login.as_str(),
    });

    let response = state
        .webhooks
        .post(&state.config.webhook_login)
        .json(&payload)
        .send()
        .await?;

    if !response.status().is_success() {
        error!("Login for {} refused: {}", form.usuario, response.status());

        return Err(AppError::Webhook(response.status().as_u16()));
    }

    let issued: LoginResponse = response.json().await?;

    // A fresh login supersedes whatever session this process still holds.
    state.clear_session();
    state.install_session(Session {
        user: form.usuario.clone(),
        token: issued.token,
    });
    state.set_poller(poller::spawn(state.clone()));

    info!("Session opened for {}", form.usuario);
    state.metrics.record(ActionKind::Login);

    Ok(())
}

pub async fn logout(state: &Arc<State>) -> Result<(), AppError> {
    let Some(session) = state.session() else {
        return Err(AppError::NotAuthenticated);
    };

    let payload = json!({
        "Usuario": session.user,
        "Data_Action": now_stamp(),
        "Action": ActionKind::Logoff.as_str(),
    });

    let result = post_webhook(state, &state.config.webhook_logout, &payload).await;

    // Local teardown happens regardless of the webhook outcome.
    state.clear_session();
    info!("Session closed for {}", session.user);
    state.metrics.record(ActionKind::Logoff);

    result
}

pub fn save_payload(id: &str, form: &SaveForm, user: &str, stamped_at: &str) -> Value {
    let received = form.recebido_em.as_deref().and_then(parse_received);

    json!({
        "Manifesto": id,
        "Numero_Manifesto": id,
        "Voo": sanitize(&form.voo),
        "Origem": sanitize(&form.origem),
        "Destino": sanitize(&form.destino),
        "Companhia": form.companhia.trim(),
        "Volumes": form.volumes,
        "Peso_Kg": form.peso_kg,
        "Recebido_Em": received.map(stamp),
        "Turno": classify(received).as_str(),
        "Status": Status::Received.as_str(),
        "Observacoes": form.observacoes.trim(),
        "Usuario_Action": user,
        "Data_Action": stamped_at,
        "Action": ActionKind::Cadastro.as_str(),
    })
}

pub fn edit_payload(form: &EditForm, user: &str, stamped_at: &str) -> Value {
    let mut payload = json!({
        "Manifesto": form.manifesto,
        "Usuario_Action": user,
        "Data_Action": stamped_at,
        "Action": ActionKind::Edicao.as_str(),
    });

    if let Some(voo) = &form.voo {
        payload["Voo"] = json!(sanitize(voo));
    }
    if let Some(origem) = &form.origem {
        payload["Origem"] = json!(sanitize(origem));
    }
    if let Some(destino) = &form.destino {
        payload["Destino"] = json!(sanitize(destino));
    }
    if let Some(companhia) = &form.companhia {
        payload["Companhia"] = json!(companhia.trim());
    }
    if let Some(volumes) = form.volumes {
        payload["Volumes"] = json!(volumes);
    }
    if let Some(peso_kg) = form.peso_kg {
        payload["Peso_Kg"] = json!(peso_kg);
    }
    if let Some(received) = &form.recebido_em {
        let parsed = parse_received(received);

        payload["Recebido_Em"] = json!(parsed.map(stamp));
        payload["Turno"] = json!(classify(parsed).as_str());
    }
    if let Some(observacoes) = &form.observacoes {
        payload["Observacoes"] = json!(observacoes.trim());
    }

    payload
}

pub fn status_payload(form: &StatusForm, user: &str, stamped_at: &str) -> Value {
    json!({
        "Manifesto": form.manifesto,
        "Motivo": form.motivo.as_deref().map(str::trim),
        "Usuario_Action": user,
        "Data_Action": stamped_at,
        "Action": form.action.kind().as_str(),
    })
}

async fn post_webhook(state: &Arc<State>, url: &str, payload: &Value) -> Result<(), AppError> {
    let response = state.webhooks.post(url).json(payload).send().await?;

    if !response.status().is_success() {
        error!("Action webhook {url} refused: {}", response.status());

        return Err(AppError::Webhook(response.status().as_u16()));
    }

    Ok(())
}

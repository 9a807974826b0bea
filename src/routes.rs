use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::actions::{self, EditForm, LoginForm, SaveForm, StatusForm};
use crate::error::AppError;
use crate::manifest::{HISTORY_TABLE, MANIFEST_ID_FIELD};
use crate::session;
use crate::state::State as AppState;

pub async fn manifests_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let views: Vec<Value> = state
        .manifests_snapshot()
        .iter()
        .map(|manifest| manifest.to_view())
        .collect();

    Json(views)
}

pub async fn next_id_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "manifesto": state.next_id() }))
}

pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let row: Option<Value> = state
        .store
        .get_by_id(HISTORY_TABLE, MANIFEST_ID_FIELD, &id)
        .await?;

    row.map(Json).ok_or(AppError::NotFound)
}

pub async fn save_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SaveForm>,
) -> Result<impl IntoResponse, AppError> {
    let id = actions::save(&state, form).await?;

    Ok((StatusCode::CREATED, Json(json!({ "manifesto": id }))))
}

pub async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<EditForm>,
) -> Result<StatusCode, AppError> {
    actions::edit(&state, form).await?;

    Ok(StatusCode::OK)
}

pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<StatusForm>,
) -> Result<StatusCode, AppError> {
    actions::status_action(&state, form).await?;

    Ok(StatusCode::OK)
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LoginForm>,
) -> Result<StatusCode, AppError> {
    actions::login(&state, form).await?;

    Ok(StatusCode::OK)
}

pub async fn logout_handler(State(state): State<Arc<AppState>>) -> Result<StatusCode, AppError> {
    actions::logout(&state).await?;

    Ok(StatusCode::OK)
}

pub async fn probe_handler(State(state): State<Arc<AppState>>) -> Result<StatusCode, AppError> {
    session::verify(&state).await?;

    Ok(StatusCode::NO_CONTENT)
}

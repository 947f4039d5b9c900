//! Route handlers.

use crate::auth::require_admin;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use painel_core::types::{Post, PostUpdate, TopicId, TOPICS};
use painel_core::validation::{validate_submission, SubmissionForm};
use painel_core::{ChartConfig, PostStore, StoreError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery {
    topic_id: Option<String>,
}

/// Body of `POST /api/posts`: a full post whose identity fields are optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewPost {
    id: Option<String>,
    topic_id: TopicId,
    #[serde(default)]
    description: String,
    chart_config: Value,
    created_at: Option<i64>,
}

/// Body of `PUT /api/posts/{id}`, before chart validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditPost {
    topic_id: TopicId,
    #[serde(default)]
    description: String,
    chart_config: Value,
}

pub(crate) async fn list_topics() -> Json<Value> {
    Json(json!({ "data": &TOPICS }))
}

pub(crate) async fn list_posts(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult {
    let posts = match query.topic_id.as_deref() {
        None | Some("") => state.store.list()?,
        Some(raw) => {
            let topic = TopicId::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Tópico desconhecido: '{raw}'.")))?;
            state.store.list_topic(topic)?
        }
    };
    Ok(Json(json!({ "data": posts })))
}

pub(crate) async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let post = state.store.get(&id)?;
    Ok(Json(json!({ "data": post })))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    require_admin(&headers, &state.admin_password)?;
    let new: NewPost = parse_body(body)?;
    let chart_config = checked_chart(&new.chart_config)?;

    let now = chrono::Utc::now().timestamp_millis();
    let id = match new.id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => state.store.fresh_id(now)?,
    };
    let post = Post {
        id: id.clone(),
        topic_id: new.topic_id,
        description: new.description,
        chart_config,
        created_at: new.created_at.unwrap_or(now),
    };
    with_store(&state, move |store| store.insert(post)).await?;

    info!(%id, topic = %new.topic_id, "post created");
    Ok(Json(json!({ "message": "Post criado com sucesso", "id": id })))
}

pub(crate) async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    require_admin(&headers, &state.admin_password)?;
    let edit: EditPost = parse_body(body)?;
    let update = PostUpdate {
        topic_id: edit.topic_id,
        description: edit.description,
        chart_config: checked_chart(&edit.chart_config)?,
    };
    let target = id.clone();
    with_store(&state, move |store| store.update(&target, update)).await?;

    info!(%id, "post updated");
    Ok(Json(json!({ "message": "Post atualizado com sucesso", "id": id })))
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    require_admin(&headers, &state.admin_password)?;
    let target = id.clone();
    with_store(&state, move |store| store.delete(&target)).await?;

    info!(%id, "post deleted");
    Ok(Json(json!({ "message": "Post deletado", "changes": 1 })))
}

/// Run a store mutation on the blocking pool: file-backed stores write and
/// fsync under their lock.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn PostStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = std::sync::Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(store.as_ref())).await?;
    Ok(result?)
}

fn parse_body<T: serde::de::DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    serde_json::from_value(value).map_err(|err| ApiError::BadRequest(format!("Corpo inválido: {err}")))
}

/// Stored charts go through the same checks as the admin form, with the
/// title and colour taken from the JSON itself.
fn checked_chart(raw: &Value) -> Result<ChartConfig, ApiError> {
    Ok(validate_submission(raw, &SubmissionForm::default())?)
}

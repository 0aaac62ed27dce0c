use super::error::{ApiError, ApiResult};
use super::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use folioapp::api::{Portfolio, PublicSite};
use folioapp::error::FolioError;
use folioapp::model::{Content, Record};
use folioapp::validate::Validate;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// List, read, create, update and delete under `base`.
pub fn collection<T: Validate>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(base, get(list::<T>).post(create::<T>))
        .route(
            &format!("{base}/:id"),
            get(show::<T>).put(update::<T>).delete(remove::<T>),
        )
}

/// Read, upsert, and update by id under `base`.
pub fn singleton<T: Validate>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(base, get(current::<T>).post(upsert::<T>))
        .route(&format!("{base}/:id"), get(show::<T>).put(update::<T>))
}

/// Parse a request body that must be a JSON object.
fn json_object(collection: folioapp::store::Collection, body: &[u8]) -> ApiResult<Value> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| FolioError::validation(collection, format!("body is not JSON: {e}")))?;
    if !value.is_object() {
        return Err(FolioError::validation(collection, "body must be a JSON object").into());
    }
    Ok(value)
}

fn payload<T: Content + DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let value = json_object(T::COLLECTION, body)?;
    serde_json::from_value(value)
        .map_err(|e| ApiError(FolioError::validation(T::COLLECTION, e.to_string())))
}

/// Read failures degrade to an empty list so the site keeps rendering.
async fn list<T: Validate>(State(state): State<AppState>) -> Json<Vec<Record<T>>> {
    match state.api.repository::<T>().get_all().await {
        Ok(records) => Json(records),
        Err(e) => {
            tracing::error!(collection = %T::COLLECTION, error = %e, "list failed; returning empty");
            Json(Vec::new())
        }
    }
}

async fn show<T: Validate>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Record<T>>> {
    state
        .api
        .repository::<T>()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError(FolioError::not_found(T::COLLECTION, id)))
}

async fn create<T: Validate>(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Record<T>>> {
    let data: T = payload(&body)?;
    data.validate()?;
    let record = state.api.repository::<T>().create(data).await?;
    tracing::info!(collection = %T::COLLECTION, id = %record.id, "created");
    Ok(Json(record))
}

async fn update<T: Validate>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Record<T>>> {
    let patch = json_object(T::COLLECTION, &body)?;
    let record = state.api.repository::<T>().update(&id, &patch).await?;
    tracing::info!(collection = %T::COLLECTION, id = %record.id, "updated");
    Ok(Json(record))
}

async fn remove<T: Validate>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.api.repository::<T>().delete(&id).await?;
    tracing::info!(collection = %T::COLLECTION, id = %id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// The singleton's record, or `null`.
async fn current<T: Validate>(State(state): State<AppState>) -> ApiResult<Json<Option<Record<T>>>> {
    Ok(Json(state.api.singleton::<T>().get().await?))
}

async fn upsert<T: Validate>(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Record<T>>> {
    let data: T = payload(&body)?;
    data.validate()?;
    let record = state.api.singleton::<T>().upsert(data).await?;
    tracing::info!(collection = %T::COLLECTION, id = %record.id, "saved");
    Ok(Json(record))
}

pub async fn portfolio(State(state): State<AppState>) -> ApiResult<Json<Portfolio>> {
    Ok(Json(state.api.portfolio().await?))
}

pub async fn public(State(state): State<AppState>) -> Json<PublicSite> {
    Json(state.api.public_site().await)
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "backend": state.api.backend_description(),
    }))
}

//! Handlers for tags and tag membership.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use kindred_core::{store::FamilyStore, tag::Tag};
use serde::Deserialize;

use crate::error::{ApiError, store_error};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub prefix: String,
}

/// `GET /tags[?prefix=...]`
pub async fn list<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Tag>>, ApiError> {
  let tags = store.search_tags(params.prefix.trim()).await.map_err(store_error)?;
  Ok(Json(tags))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub label: String,
}

/// `POST /tags`; an existing label is returned as-is with 200.
pub async fn create<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let label = body.label.trim();
  if let Some(existing) = store.get_tag_by_label(label).await.map_err(store_error)? {
    return Ok((StatusCode::OK, Json(existing)));
  }
  let tag = store.insert_tag(label).await.map_err(store_error)?;
  Ok((StatusCode::CREATED, Json(tag)))
}

/// `GET /tags/{id}`
pub async fn get_one<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Tag>, ApiError> {
  let tag = store
    .get_tag(id)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound(format!("tag not found: {id}")))?;
  Ok(Json(tag))
}

/// `DELETE /tags/{id}`
pub async fn delete_one<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store.delete_tag(id).await.map_err(store_error)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Membership ───────────────────────────────────────────────────────────────

/// `GET /people/{id}/tags`
pub async fn for_person<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(person_id): Path<i64>,
) -> Result<Json<Vec<Tag>>, ApiError> {
  Ok(Json(store.tags_for_person(person_id).await.map_err(store_error)?))
}

/// `PUT /people/{id}/tags/{tag_id}`
pub async fn attach<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path((person_id, tag_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
  if store.get_person_lite(person_id).await.map_err(store_error)?.is_none() {
    return Err(ApiError::NotFound(format!("person not found: {person_id}")));
  }
  if store.get_tag(tag_id).await.map_err(store_error)?.is_none() {
    return Err(ApiError::NotFound(format!("tag not found: {tag_id}")));
  }
  store.tag_person(tag_id, person_id).await.map_err(store_error)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /people/{id}/tags/{tag_id}`
pub async fn detach<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path((person_id, tag_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
  store.untag_person(tag_id, person_id).await.map_err(store_error)?;
  Ok(StatusCode::NO_CONTENT)
}

//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | Every person, by last then first name |
//! | `POST`   | `/people` | Body: [`NewPerson`]; returns 201 + stored person |
//! | `GET`    | `/people/search` | `?prefix=...[&offset=...][&limit=...]` |
//! | `GET`    | `/people/graph` | Graphviz DOT of every parent/child link |
//! | `GET`    | `/people/{id}` | Resolved detail plus grandparents and age |
//! | `PUT`    | `/people/{id}` | Body: [`NewPerson`]; replaces the row |
//! | `DELETE` | `/people/{id}` | Also drops the person's spouse rows and tags |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Local;
use kindred_core::{
  graph::family_graph_dot,
  person::{Grandparents, NewPerson, Person, PersonDetail, PersonLite},
  resolve::{resolve_grandparents, resolve_person_detail},
  store::FamilyStore,
  tag::Tag,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ApiError, store_error};

const DEFAULT_SEARCH_LIMIT: usize = 20;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people`
pub async fn list<S: FamilyStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<PersonLite>>, ApiError> {
  let people = store.list_people().await.map_err(store_error)?;
  Ok(Json(people))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub prefix: String,
  #[serde(default)]
  pub offset: usize,
  pub limit:  Option<usize>,
}

/// `GET /people/search?prefix=...[&offset=...][&limit=...]`
pub async fn search<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PersonLite>>, ApiError> {
  let people = store
    .search_people(
      params.prefix.trim(),
      params.offset,
      params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
    )
    .await
    .map_err(store_error)?;
  Ok(Json(people))
}

/// `GET /people/graph`
pub async fn graph<S: FamilyStore>(State(store): State<Arc<S>>) -> Result<String, ApiError> {
  let people = store.list_people().await.map_err(store_error)?;
  Ok(family_graph_dot(&people))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /people`
pub async fn create<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError> {
  let id = store.insert_person(body).await.map_err(store_error)?;
  let person = fetch(&*store, id).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

async fn fetch<S: FamilyStore>(store: &S, id: i64) -> Result<Person, ApiError> {
  store
    .get_person(id)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound(format!("person not found: {id}")))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// Everything the person page shows.
#[derive(Debug, Serialize)]
pub struct PersonView {
  #[serde(flatten)]
  pub detail:       PersonDetail,
  pub grandparents: Grandparents,
  /// Completed years as of today, when the birth date is known.
  pub age:          Option<u32>,
  pub tags:         Vec<Tag>,
}

/// `GET /people/{id}`
pub async fn get_one<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<PersonView>, ApiError> {
  let detail = resolve_person_detail(&*store, id).await?;
  let grandparents = resolve_grandparents(&*store, &detail).await;
  let tags = store.tags_for_person(id).await.map_err(store_error)?;

  let today = Local::now().date_naive();
  let age = match detail.person.age(today) {
    Ok(age) => age,
    Err(e) => {
      warn!(person_id = id, error = %e, "age unavailable");
      None
    }
  };

  Ok(Json(PersonView { detail, grandparents, age, tags }))
}

// ─── Update / delete ──────────────────────────────────────────────────────────

/// `PUT /people/{id}`
pub async fn update<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewPerson>,
) -> Result<Json<Person>, ApiError> {
  store.update_person(id, body).await.map_err(store_error)?;
  Ok(Json(fetch(&*store, id).await?))
}

/// `DELETE /people/{id}`
pub async fn delete_one<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store.delete_person(id).await.map_err(store_error)?;
  Ok(StatusCode::NO_CONTENT)
}

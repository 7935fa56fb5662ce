//! Handlers for `/spouses`.
//!
//! The pair is unordered: `{"person_a": 2, "person_b": 1}` and
//! `{"person_a": 1, "person_b": 2}` name the same relation.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use kindred_core::{
  spouse::{NewSpouse, SpousePair},
  store::FamilyStore,
};
use serde::Deserialize;

use crate::error::{ApiError, store_error};

/// `POST /spouses`; body: [`NewSpouse`].
pub async fn create<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewSpouse>,
) -> Result<impl IntoResponse, ApiError> {
  for id in [body.person_a, body.person_b] {
    if store.get_person_lite(id).await.map_err(store_error)?.is_none() {
      return Err(ApiError::NotFound(format!("person not found: {id}")));
    }
  }
  let row = store.insert_spouse(body).await.map_err(store_error)?;
  Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
pub struct PairBody {
  pub person_a: i64,
  pub person_b: i64,
}

/// `DELETE /spouses`; body: `{"person_a":..,"person_b":..}`.
pub async fn delete<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<PairBody>,
) -> Result<StatusCode, ApiError> {
  let pair = SpousePair::new(body.person_a, body.person_b)?;
  store.delete_spouse(pair).await.map_err(store_error)?;
  Ok(StatusCode::NO_CONTENT)
}

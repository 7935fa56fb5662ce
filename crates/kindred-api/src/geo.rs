//! Handlers for cities, regions, countries, and continents.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/cities/search` | `?prefix=...` |
//! | `POST`   | `/cities` | Body: `{"name":"Portland","region_id":3}` |
//! | `GET`    | `/cities/{id}` | |
//! | `DELETE` | `/cities/{id}` | |
//! | `GET`    | `/regions` | `?country_code=US` |
//! | `POST`   | `/regions` | Body: [`NewRegion`] |
//! | `GET`    | `/regions/{id}` | |
//! | `GET`    | `/countries` | By name |
//! | `POST`   | `/countries` | Body: [`NewCountry`] |
//! | `GET`    | `/countries/{code}` | |
//! | `PUT`    | `/countries/{code}` | Body: [`NewCountry`]; may change the code |
//! | `DELETE` | `/countries/{code}` | |
//! | `GET`    | `/countries/{code}/regions` | |
//! | `GET`    | `/continents` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use kindred_core::{
  geo::{City, Continent, Country, NewCountry, NewRegion, Region},
  store::FamilyStore,
};
use serde::Deserialize;

use crate::error::{ApiError, store_error};

fn require(field: &str, value: &str) -> Result<(), ApiError> {
  if value.trim().is_empty() {
    return Err(ApiError::BadRequest(format!("{field} can not be empty")));
  }
  Ok(())
}

// ─── Cities ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PrefixParams {
  #[serde(default)]
  pub prefix: String,
}

/// `GET /cities/search?prefix=...`
pub async fn search_cities<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<PrefixParams>,
) -> Result<Json<Vec<City>>, ApiError> {
  let cities = store.search_cities(params.prefix.trim()).await.map_err(store_error)?;
  Ok(Json(cities))
}

/// `GET /cities/{id}`
pub async fn get_city<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<City>, ApiError> {
  let city = store
    .get_city(id)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound(format!("city not found: {id}")))?;
  Ok(Json(city))
}

#[derive(Debug, Deserialize)]
pub struct CityBody {
  pub name:      String,
  pub region_id: i64,
}

/// `POST /cities`
pub async fn create_city<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CityBody>,
) -> Result<impl IntoResponse, ApiError> {
  require("city name", &body.name)?;
  if store.get_region(body.region_id).await.map_err(store_error)?.is_none() {
    return Err(ApiError::NotFound(format!("region not found: {}", body.region_id)));
  }
  let city = store
    .insert_city(body.name.trim(), body.region_id)
    .await
    .map_err(store_error)?;
  Ok((StatusCode::CREATED, Json(city)))
}

/// `DELETE /cities/{id}`
pub async fn delete_city<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store.delete_city(id).await.map_err(store_error)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Regions ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegionParams {
  pub country_code: Option<String>,
}

/// `GET /regions[?country_code=...]`
pub async fn list_regions<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<RegionParams>,
) -> Result<Json<Vec<Region>>, ApiError> {
  let regions = store.list_regions(params.country_code).await.map_err(store_error)?;
  Ok(Json(regions))
}

/// `GET /countries/{code}/regions`
pub async fn country_regions<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<Vec<Region>>, ApiError> {
  if store.get_country(&code).await.map_err(store_error)?.is_none() {
    return Err(ApiError::NotFound(format!("country not found: {code}")));
  }
  let regions = store.list_regions(Some(code)).await.map_err(store_error)?;
  Ok(Json(regions))
}

/// `GET /regions/{id}`
pub async fn get_region<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Region>, ApiError> {
  let region = store
    .get_region(id)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound(format!("region not found: {id}")))?;
  Ok(Json(region))
}

/// `POST /regions`
pub async fn create_region<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewRegion>,
) -> Result<impl IntoResponse, ApiError> {
  require("region code", &body.code)?;
  require("region name", &body.name)?;
  if store.get_country(&body.country_code).await.map_err(store_error)?.is_none() {
    return Err(ApiError::NotFound(format!("country not found: {}", body.country_code)));
  }
  let region = store.insert_region(body).await.map_err(store_error)?;
  Ok((StatusCode::CREATED, Json(region)))
}

// ─── Countries ────────────────────────────────────────────────────────────────

/// `GET /countries`
pub async fn list_countries<S: FamilyStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Country>>, ApiError> {
  Ok(Json(store.list_countries().await.map_err(store_error)?))
}

/// `GET /countries/{code}`
pub async fn get_country<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<Country>, ApiError> {
  fetch_country(&*store, &code).await.map(Json)
}

async fn fetch_country<S: FamilyStore>(store: &S, code: &str) -> Result<Country, ApiError> {
  store
    .get_country(code)
    .await
    .map_err(store_error)?
    .ok_or_else(|| ApiError::NotFound(format!("country not found: {code}")))
}

/// `POST /countries`
pub async fn create_country<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCountry>,
) -> Result<impl IntoResponse, ApiError> {
  require("country code", &body.code)?;
  require("country name", &body.name)?;
  let code = body.code.clone();
  store.insert_country(body).await.map_err(store_error)?;
  let country = fetch_country(&*store, &code).await?;
  Ok((StatusCode::CREATED, Json(country)))
}

/// `PUT /countries/{code}`
pub async fn update_country<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
  Json(body): Json<NewCountry>,
) -> Result<Json<Country>, ApiError> {
  require("country code", &body.code)?;
  require("country name", &body.name)?;
  let new_code = body.code.clone();
  store.update_country(&code, body).await.map_err(store_error)?;
  Ok(Json(fetch_country(&*store, &new_code).await?))
}

/// `DELETE /countries/{code}`
pub async fn delete_country<S: FamilyStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
  store.delete_country(&code).await.map_err(store_error)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /continents`
pub async fn list_continents<S: FamilyStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Continent>>, ApiError> {
  Ok(Json(store.list_continents().await.map_err(store_error)?))
}

//! JSON REST API for Kindred.
//!
//! Exposes an axum [`Router`] backed by any [`kindred_core::store::FamilyStore`].
//! Handlers are thin: each one calls a store method or a core builder and
//! serialises the result. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kindred_api::api_router(store.clone()))
//! ```

pub mod calendar;
pub mod error;
pub mod geo;
pub mod people;
pub mod spouses;
pub mod tags;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use kindred_core::store::FamilyStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FamilyStore + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route("/people/search", get(people::search::<S>))
    .route("/people/graph", get(people::graph::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .put(people::update::<S>)
        .delete(people::delete_one::<S>),
    )
    .route("/people/{id}/tags", get(tags::for_person::<S>))
    .route(
      "/people/{id}/tags/{tag_id}",
      put(tags::attach::<S>).delete(tags::detach::<S>),
    )
    // Spouses
    .route("/spouses", post(spouses::create::<S>).delete(spouses::delete::<S>))
    // Calendars
    .route("/calendar", get(calendar::year::<S>))
    .route("/reminders", get(calendar::reminders::<S>))
    .route("/holidays", get(calendar::holidays::<S>).post(calendar::create_holiday::<S>))
    // Geography
    .route("/cities", post(geo::create_city::<S>))
    .route("/cities/search", get(geo::search_cities::<S>))
    .route("/cities/{id}", get(geo::get_city::<S>).delete(geo::delete_city::<S>))
    .route("/regions", get(geo::list_regions::<S>).post(geo::create_region::<S>))
    .route("/regions/{id}", get(geo::get_region::<S>))
    .route("/countries", get(geo::list_countries::<S>).post(geo::create_country::<S>))
    .route(
      "/countries/{code}",
      get(geo::get_country::<S>)
        .put(geo::update_country::<S>)
        .delete(geo::delete_country::<S>),
    )
    .route("/countries/{code}/regions", get(geo::country_regions::<S>))
    .route("/continents", get(geo::list_continents::<S>))
    // Tags
    .route("/tags", get(tags::list::<S>).post(tags::create::<S>))
    .route("/tags/{id}", get(tags::get_one::<S>).delete(tags::delete_one::<S>))
    .with_state(store)
}

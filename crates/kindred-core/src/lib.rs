//! Core types and derivations for the Kindred family record-keeper.
//!
//! No HTTP or database dependencies live here. The crate owns
//! the domain model, the [`store::FamilyStore`] abstraction, and the pure
//! logic built on top of it: name formatting, relationship resolution, the
//! recurring-date matcher, and the birthday/anniversary calendar.

pub mod age;
pub mod calendar;
pub mod date;
pub mod error;
pub mod geo;
pub mod graph;
pub mod holiday;
pub mod name;
pub mod person;
pub mod reminder;
pub mod resolve;
pub mod spouse;
pub mod store;
pub mod tag;

pub use error::{Error, Result};

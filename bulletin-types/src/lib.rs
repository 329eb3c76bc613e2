//! Fundamental, collection-agnostic types for the Bulletin core.
//!
//! This crate defines the types every other Bulletin crate builds on:
//!
//! - [`EntityId`]: opaque, backend-assigned identifiers
//! - [`Entity`]: the trait items of a managed collection implement
//! - [`QueryParams`] / [`QueryPatch`]: the immutable view-request value
//!   object and its partial-override companion
//!
//! Domain records (articles, categories, media files) live in
//! `bulletin-model`, not here.

mod entity;
mod ids;
mod query;

pub use entity::Entity;
pub use ids::EntityId;
pub use query::{QueryParams, QueryPatch, SortOrder, StatusFilter};

//! Planet catalogue REST service.
//!
//! Planets are stored in SQLite and served over HTTP by an axum router.
//! Listings can be narrowed by climate and terrain; see [`query`] for how
//! filters compose.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod service;

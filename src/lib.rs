//! bluegreen: a status service for blue-green deployments.
//!
//! Serves an HTML page and a handful of JSON endpoints that report which
//! version and color of the application is answering, plus a PostgreSQL
//! connectivity probe and a version-gated feature endpoint.

pub mod config;
pub mod db;
pub mod error;
pub mod host;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod templates;

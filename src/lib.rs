//! SMASH
//!
//! Upload images, have their text recognised by Haven OnDemand OCR, add the
//! text to a Haven OnDemand text index and search it later. The remote API is
//! asynchronous: jobs are submitted, then polled until they finish or fail.

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

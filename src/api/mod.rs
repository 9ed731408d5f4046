//! HTTP API for the alarm snapshot service

pub mod handlers;
pub mod models;
pub mod routes;

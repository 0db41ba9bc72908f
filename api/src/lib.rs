//! # CityScout API
//!
//! HTTP surface of the CityScout portal backend: route handlers, request
//! and response DTOs, authentication middleware and error mapping.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

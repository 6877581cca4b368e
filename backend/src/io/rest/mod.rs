//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the membership system. This layer
//! handles:
//! - HTTP request/response serialization and deserialization
//! - Session resolution for protected endpoints
//! - Error translation from domain to HTTP status codes
//! - Request logging

// Module declarations
pub mod auth_apis;
pub mod member_table_apis;
pub mod person_apis;
pub mod registration_apis;
pub mod scout_apis;

pub mod mappers;

//! # DevMatch Shared Library
//!
//! This crate contains the shared types, database models, and business logic
//! used by the DevMatch API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (companies, users, projects, techs, estimates)
//! - `patch`: Partial-update applier for field-name driven entity patches
//! - `auth`: Password hashing, JWT tokens, and request auth context
//! - `db`: Connection pool and migration utilities

pub mod auth;
pub mod db;
pub mod models;
pub mod patch;

/// Current version of the DevMatch shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

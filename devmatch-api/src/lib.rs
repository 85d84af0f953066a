//! # DevMatch API Server Library
//!
//! Router, configuration, error mapping, and route handlers for the
//! DevMatch REST API. The binary in `main.rs` wires these together; the
//! integration tests build the router directly.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;

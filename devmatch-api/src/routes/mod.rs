//! HTTP route handlers, one module per resource.

pub mod auth;
pub mod companies;
pub mod estimates;
pub mod health;
pub mod projects;
pub mod techs;
pub mod users;

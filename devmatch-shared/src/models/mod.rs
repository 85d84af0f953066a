//! Database models
//!
//! One module per table, each pairing a `sqlx::FromRow` struct with its
//! query functions. Account-like entities (companies, company profiles,
//! users, projects) also implement the patch dispatch traits from
//! [`crate::patch`].

pub mod company;
pub mod company_info;
pub mod estimate;
pub mod project;
pub mod project_tech;
pub mod tech;
pub mod user;

//! Shared types, errors, and configuration for Hearth.
//!
//! This crate provides common types used across all other crates:
//! - Pagination types for list endpoints
//! - JWT claims validation for the auth boundary
//! - Configuration management

pub mod config;
pub mod jwt;
pub mod types;

pub use config::AppConfig;
pub use jwt::{Claims, JwtError, JwtService};
pub use types::{PageRequest, PageResponse};

//! Core budgeting logic for Hearth.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and summary
//! calculations live here.
//!
//! # Modules
//!
//! - `budget` - Month normalization, payload validation, and summary
//!   aggregation for household budgets

pub mod budget;

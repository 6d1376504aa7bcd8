//! Shared domain types for the Reel movie catalogue.
//!
//! Holds the pieces every other crate agrees on: primary key types, the
//! domain error enum, field-level validation errors and value coercion,
//! and poster image checks.

pub mod error;
pub mod fields;
pub mod poster;
pub mod types;

//! Domain primitives for the Grimoire authorization service.
//!
//! This crate has no internal dependencies so it can be used by the API
//! layer, the data layer, and any future CLI or worker tooling.

pub mod audit;
pub mod error;
pub mod scopes;
pub mod secrets;
pub mod types;

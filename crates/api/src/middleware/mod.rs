//! Request authentication helpers.

pub mod auth;

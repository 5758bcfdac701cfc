//! HTTP surface: wire models and the handlers that serve them.

pub mod handlers;
pub mod models;

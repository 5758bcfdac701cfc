//! Database layer: error translation, repositories, and models.

pub mod errors;
pub mod handlers;
pub mod models;

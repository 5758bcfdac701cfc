//! Database request/response models, one module per table group.

pub mod categories;
pub mod todos;
pub mod users;

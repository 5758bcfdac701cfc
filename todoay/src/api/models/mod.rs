//! Wire-level request and response models.

pub mod categories;
pub mod todos;
pub mod users;

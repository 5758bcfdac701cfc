//! Authentication and authorization: password hashing, JWT tokens, request
//! identity resolution, and ownership checks.

pub mod current_user;
pub mod ownership;
pub mod password;
pub mod token;

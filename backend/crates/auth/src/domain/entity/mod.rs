//! Entities

pub mod auth_token;
pub mod user;

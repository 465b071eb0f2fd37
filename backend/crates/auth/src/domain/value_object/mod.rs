//! Value Object Module

pub mod email;
pub mod token_key;
pub mod user_id;
pub mod user_name;
pub mod user_password;

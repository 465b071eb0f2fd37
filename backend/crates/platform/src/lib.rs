//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Environment configuration helpers
//! - Secure random token generation
//! - Password hashing (Argon2id) and a pluggable password policy
//!   (NIST SP 800-63B defaults, optional HIBP breach check)

pub mod config;
pub mod crypto;
pub mod password;

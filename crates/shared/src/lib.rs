//! Shared utilities and common types for the dealership backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (API key hashing and generation)
//! - URL slug generation
//! - Common validation logic
//! - Page/limit pagination math

pub mod crypto;
pub mod pagination;
pub mod slug;
pub mod validation;

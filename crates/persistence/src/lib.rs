//! Persistence layer for the dealership backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The two-tier (memory + Redis) cache

pub mod cache;
pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;

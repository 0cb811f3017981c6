//! Domain layer for the dealership backend.
//!
//! This crate contains:
//! - Domain models (Vehicle, leads, InventoryAlert, Testimonial, BlogPost, ...)
//! - Business logic services (pricing rule evaluation)
//! - Client-side list stores (compare, search, saved searches, recently viewed, alerts)

pub mod models;
pub mod services;
pub mod stores;

// Library exports for GymFlow
// The binary and the integration tests both build on these modules.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

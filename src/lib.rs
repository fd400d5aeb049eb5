//! Restaurant Roulette: spin a wheel, find somewhere to eat.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod random;
pub mod wheel;
pub mod venues;
pub mod cuisine;
pub mod session;
pub mod storage;
pub mod dashboard;

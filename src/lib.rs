//! HRMS onboarding — employee profile wizard core.

pub mod config;
pub mod error;
pub mod identity;
pub mod onboarding;
pub mod store;

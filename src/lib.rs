//! Fuel My Dream — donation marketplace core.

pub mod app;
pub mod catalog;
pub mod config;
pub mod donation;
pub mod error;
pub mod notify;
pub mod onboarding;
pub mod pages;
pub mod wallet;

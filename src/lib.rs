//! Trackforge - probe, remux and edit Matroska files
//!
//! This library crate exposes the orchestration layer for integration testing.

pub mod batch;
pub mod commit;
pub mod config;
pub mod services;

//! hardsub - batch subtitle burn-in for episodic video
//!
//! This library crate exposes the batch planner and its building blocks for
//! the CLI and for integration testing.

pub mod config;
pub mod key;
pub mod planner;
pub mod prompt;
pub mod resolve;

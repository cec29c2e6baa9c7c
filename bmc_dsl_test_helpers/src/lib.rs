//! Test helpers shared across crates.
//!
//! This crate provides resource tree fixtures, JSON conversions and a
//! `figment::Jail` wrapper for settings tests.

pub mod figment;
pub mod json;
pub mod tree;

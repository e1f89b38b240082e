//! Integration tests for LFX crates.
//!
//! This crate contains end-to-end tests that exercise the light field
//! operations together with PNG I/O.

//! Integration test crate for Reelcut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every reelcut library crate to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod media;

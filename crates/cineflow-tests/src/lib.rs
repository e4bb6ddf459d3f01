//! Integration test crate for CineFlow.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every cineflow crate to verify they work together.

#[cfg(test)]
mod editing;

#[cfg(test)]
mod media;

//! Test module for zod-json-schema
//!
//! This module contains property-based tests using proptest that exercise
//! the compiler on randomly generated, possibly cyclic, schema graphs.

#[cfg(test)]
pub mod graph;

//! Unit tests for the metadata parser.
//!
//! These tests cover node creation, tree consistency, the flat revision
//! index and the degraded handling of malformed hierarchies.

mod fixtures;
mod tree_tests;

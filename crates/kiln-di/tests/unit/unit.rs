//! Unit tests for kiln-di crate components
//!
//! Each test file focuses on one part of the container's behavior.

pub mod fixtures;

pub mod cache_tier_tests;
pub mod collation_tests;
pub mod cycle_detection_tests;
pub mod instantiation_tests;
pub mod metadata_source_tests;
pub mod scope_bubbling_tests;

//! Property-based tests for kiln-di

pub mod registration_properties;

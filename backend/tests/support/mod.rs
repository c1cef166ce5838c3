//! Shared fixtures for attendance integration tests.

pub mod cafeteria;

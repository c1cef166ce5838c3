//! Outbound adapters implementing domain ports for infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel.

pub mod persistence;

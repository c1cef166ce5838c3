//! Cafeteria attendance backend.
//!
//! Teachers receive a time-bounded link per (grade, meal service, date) and
//! use it to mark each student as `Si`, `No` or `Ausente`. The crate follows
//! a hexagonal layout: [`domain`] holds types, services and ports,
//! [`inbound`] exposes them over HTTP, and [`outbound`] implements the
//! driven ports on PostgreSQL.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows (`models.rs`, `schema.rs`) and
//! domain types. Connections come from a `bb8` pool through `diesel-async`;
//! every database failure is mapped into the port's error type.
//!
//! # Example
//!
//! ```ignore
//! use comedor_backend::outbound::persistence::{DbPool, DieselRosterRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/comedor")).await?;
//! let roster = DieselRosterRepository::new(pool);
//! ```

mod diesel_attendance_record_repository;
mod diesel_attendance_token_repository;
mod diesel_basic_error_mapping;
mod diesel_meal_service_repository;
mod diesel_roster_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_attendance_record_repository::DieselAttendanceRecordRepository;
pub use diesel_attendance_token_repository::DieselAttendanceTokenRepository;
pub use diesel_meal_service_repository::DieselMealServiceRepository;
pub use diesel_roster_repository::DieselRosterRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

//! Port for meal service lookups.

use async_trait::async_trait;

use crate::domain::{MealService, ServiceId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by meal service repository adapters.
    pub enum MealServiceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "meal service repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "meal service repository query failed: {message}",
    }
}

/// Read-only access to `servicios`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MealServiceRepository: Send + Sync {
    /// Find a service by id.
    async fn find(&self, id: ServiceId) -> Result<Option<MealService>, MealServiceRepositoryError>;
}

/// Fixture implementation that knows no services.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMealServiceRepository;

#[async_trait]
impl MealServiceRepository for FixtureMealServiceRepository {
    async fn find(&self, _id: ServiceId) -> Result<Option<MealService>, MealServiceRepositoryError> {
        Ok(None)
    }
}

//! Builders for HTTP state ports.

use std::sync::Arc;

use mockable::DefaultClock;

use comedor_backend::domain::{AttendanceRegistrationService, AttendanceRepositories};
use comedor_backend::inbound::http::state::HttpState;
use comedor_backend::outbound::persistence::{
    DbPool, DieselAttendanceRecordRepository, DieselAttendanceTokenRepository,
    DieselMealServiceRepository, DieselRosterRepository,
};

use super::ServerConfig;

/// Repositories backed by one shared pool.
fn diesel_repositories(
    pool: &DbPool,
) -> AttendanceRepositories<
    DieselAttendanceTokenRepository,
    DieselRosterRepository,
    DieselMealServiceRepository,
    DieselAttendanceRecordRepository,
> {
    AttendanceRepositories {
        tokens: Arc::new(DieselAttendanceTokenRepository::new(pool.clone())),
        roster: Arc::new(DieselRosterRepository::new(pool.clone())),
        services: Arc::new(DieselMealServiceRepository::new(pool.clone())),
        records: Arc::new(DieselAttendanceRecordRepository::new(pool.clone())),
    }
}

/// Use the database-backed service when a pool is configured, fixtures
/// otherwise.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            let service = AttendanceRegistrationService::new(
                diesel_repositories(pool),
                Arc::new(DefaultClock),
                config.link_base.clone(),
            )
            .with_token_policy(config.token_policy);
            HttpState::from_service(Arc::new(service))
        }
        None => HttpState::fixtures(),
    }
}

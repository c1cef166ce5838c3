//! Attendance registration service.
//!
//! Implements token issuance, sheet opening and batch registration over the
//! driven repositories. Every token-scoped operation validates the token
//! against the injected clock before touching any other data.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{
    AttendanceRecordRepository, AttendanceRecordRepositoryError, AttendanceRegistrationCommand,
    AttendanceRegistrationQuery, AttendanceTokenCommand, AttendanceTokenRepository,
    AttendanceTokenRepositoryError, GenerateTokenRequest, GenerateTokenResponse,
    MealServiceRepository, OpenSheetRequest, OpenSheetResponse, RegisterAttendanceRequest,
    RegisterAttendanceResponse, RosterRepository, RosterRepositoryError,
};
use crate::domain::{
    AttendanceSummary, AttendanceToken, Error, MealService, RegistrationLinkBase, TokenPolicy,
    TokenRejection, TokenScope, TokenValue, latest_per_enrollment, school_year_for,
};

fn map_token_repository_error(error: AttendanceTokenRepositoryError) -> Error {
    match error {
        AttendanceTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token store unavailable: {message}"))
        }
        AttendanceTokenRepositoryError::Query { message } => {
            Error::internal(format!("token store error: {message}"))
        }
    }
}

fn map_roster_repository_error(error: RosterRepositoryError) -> Error {
    match error {
        RosterRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("roster unavailable: {message}"))
        }
        RosterRepositoryError::Query { message } => {
            Error::internal(format!("roster query failed: {message}"))
        }
    }
}

fn map_record_repository_error(error: AttendanceRecordRepositoryError) -> Error {
    match error {
        AttendanceRecordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("attendance store unavailable: {message}"))
        }
        AttendanceRecordRepositoryError::Query { message } => {
            Error::internal(format!("attendance store error: {message}"))
        }
        AttendanceRecordRepositoryError::UnknownReference { message } => {
            Error::invalid_request(format!("attendance references an unknown row: {message}"))
                .with_details(json!({ "field": "asistencias", "code": "unknown_reference" }))
        }
    }
}

/// Driven ports the registration service depends on.
pub struct AttendanceRepositories<T, R, S, A> {
    /// Token store.
    pub tokens: Arc<T>,
    /// Roster lookups.
    pub roster: Arc<R>,
    /// Meal service lookups.
    pub services: Arc<S>,
    /// Attendance table.
    pub records: Arc<A>,
}

impl<T, R, S, A> Clone for AttendanceRepositories<T, R, S, A> {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
            roster: Arc::clone(&self.roster),
            services: Arc::clone(&self.services),
            records: Arc::clone(&self.records),
        }
    }
}

/// Service implementing the attendance driving ports.
pub struct AttendanceRegistrationService<T, R, S, A> {
    repos: AttendanceRepositories<T, R, S, A>,
    clock: Arc<dyn Clock>,
    policy: TokenPolicy,
    link_base: RegistrationLinkBase,
}

impl<T, R, S, A> Clone for AttendanceRegistrationService<T, R, S, A> {
    fn clone(&self) -> Self {
        Self {
            repos: self.repos.clone(),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
            link_base: self.link_base.clone(),
        }
    }
}

impl<T, R, S, A> AttendanceRegistrationService<T, R, S, A> {
    /// Create a service using the default 24 hour token policy.
    pub fn new(
        repos: AttendanceRepositories<T, R, S, A>,
        clock: Arc<dyn Clock>,
        link_base: RegistrationLinkBase,
    ) -> Self {
        Self {
            repos,
            clock,
            policy: TokenPolicy::default(),
            link_base,
        }
    }

    /// Override the validity window for newly issued tokens.
    pub fn with_token_policy(mut self, policy: TokenPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<T, R, S, A> AttendanceRegistrationService<T, R, S, A>
where
    T: AttendanceTokenRepository,
{
    async fn resolve_token(&self, raw: &str) -> Result<AttendanceToken, Error> {
        let value = TokenValue::parse(raw)?;
        let token = self
            .repos
            .tokens
            .find(&value)
            .await
            .map_err(map_token_repository_error)?
            .ok_or(TokenRejection::Invalid)?;
        token.validate_at(self.clock.utc())?;
        Ok(token)
    }
}

impl<T, R, S, A> AttendanceRegistrationService<T, R, S, A>
where
    S: MealServiceRepository,
{
    async fn describe_service(&self, scope: &TokenScope) -> MealService {
        match self.repos.services.find(scope.service_id).await {
            Ok(Some(service)) => service,
            Ok(None) => MealService::placeholder(scope.service_id),
            Err(error) => {
                warn!(
                    service_id = %scope.service_id,
                    %error,
                    "meal service lookup failed; using placeholder"
                );
                MealService::placeholder(scope.service_id)
            }
        }
    }
}

#[async_trait]
impl<T, R, S, A> AttendanceTokenCommand for AttendanceRegistrationService<T, R, S, A>
where
    T: AttendanceTokenRepository,
    R: Send + Sync,
    S: Send + Sync,
    A: Send + Sync,
{
    async fn generate_token(
        &self,
        request: GenerateTokenRequest,
    ) -> Result<GenerateTokenResponse, Error> {
        let token = AttendanceToken::issue(request.scope, self.clock.utc(), self.policy);
        self.repos
            .tokens
            .insert(&token)
            .await
            .map_err(map_token_repository_error)?;
        debug!(
            grade = %token.scope().grade_name,
            service_id = %token.scope().service_id,
            expires_at = %token.expires_at(),
            "issued attendance token"
        );

        Ok(GenerateTokenResponse {
            token: token.value(),
            link: self.link_base.link_for(token.value()),
            expires_at: token.expires_at(),
        })
    }
}

#[async_trait]
impl<T, R, S, A> AttendanceRegistrationQuery for AttendanceRegistrationService<T, R, S, A>
where
    T: AttendanceTokenRepository,
    R: RosterRepository,
    S: MealServiceRepository,
    A: AttendanceRecordRepository,
{
    async fn open_sheet(&self, request: OpenSheetRequest) -> Result<OpenSheetResponse, Error> {
        let token = self.resolve_token(&request.token).await?;
        let scope = token.scope();

        let students = self
            .repos
            .roster
            .list_enrolled(&scope.grade_name, school_year_for(scope.date))
            .await
            .map_err(map_roster_repository_error)?;
        let service = self.describe_service(scope).await;

        let enrolled: HashSet<_> = students.iter().map(|student| student.enrollment_id).collect();
        let records = self
            .repos
            .records
            .list_for_sheet(scope.sheet_key())
            .await
            .map_err(map_record_repository_error)?
            .into_iter()
            .filter(|record| enrolled.contains(&record.enrollment_id))
            .collect();

        Ok(OpenSheetResponse {
            scope: scope.clone(),
            expires_at: token.expires_at(),
            students,
            service,
            records,
        })
    }
}

#[async_trait]
impl<T, R, S, A> AttendanceRegistrationCommand for AttendanceRegistrationService<T, R, S, A>
where
    T: AttendanceTokenRepository,
    R: Send + Sync,
    S: Send + Sync,
    A: AttendanceRecordRepository,
{
    async fn register(
        &self,
        request: RegisterAttendanceRequest,
    ) -> Result<RegisterAttendanceResponse, Error> {
        let token = self.resolve_token(&request.token).await?;
        if request.marks.is_empty() {
            return Err(
                Error::invalid_request("asistencias must contain at least one entry")
                    .with_details(json!({ "field": "asistencias", "code": "empty_batch" })),
            );
        }

        let written = self
            .repos
            .records
            .upsert_batch(token.scope().sheet_key(), &request.marks, self.clock.utc())
            .await
            .map_err(map_record_repository_error)?;
        let records = latest_per_enrollment(written);
        let summary = AttendanceSummary::from_records(&records);
        debug!(
            registered = records.len(),
            grade = %token.scope().grade_name,
            "registered attendance batch"
        );

        Ok(RegisterAttendanceResponse {
            registered: records.len(),
            records,
            summary,
        })
    }
}

#[cfg(test)]
#[path = "attendance_registration_service_tests.rs"]
mod tests;

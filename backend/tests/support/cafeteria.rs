//! An in-memory cafeteria: roster, meal services, token store and
//! attendance table wired into the registration service.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use comedor_backend::domain::{
    AttendanceRegistrationService, AttendanceRepositories, GradeName, MealService, PersonId,
    RegistrationLinkBase, ServiceId, TokenScope,
};
use comedor_backend::test_support::roster::student;
use comedor_backend::test_support::{
    InMemoryAttendanceRecordRepository, InMemoryAttendanceTokenRepository,
    InMemoryMealServiceRepository, InMemoryRosterRepository, MutableClock,
};

pub const FRONTEND: &str = "http://localhost:5173";

pub type InMemoryRegistrationService = AttendanceRegistrationService<
    InMemoryAttendanceTokenRepository,
    InMemoryRosterRepository,
    InMemoryMealServiceRepository,
    InMemoryAttendanceRecordRepository,
>;

pub struct Cafeteria {
    pub clock: Arc<MutableClock>,
    pub tokens: Arc<InMemoryAttendanceTokenRepository>,
    pub records: Arc<InMemoryAttendanceRecordRepository>,
    pub service: Arc<InMemoryRegistrationService>,
}

/// 08:00 UTC on the service date.
pub fn opening_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0)
        .single()
        .expect("valid opening time")
}

/// Teacher 7, grade "3ro A", 2025-06-10, service 1.
pub fn lunch_scope() -> TokenScope {
    TokenScope {
        teacher_id: PersonId::new(7).expect("teacher id"),
        grade_name: GradeName::new("3ro A").expect("grade"),
        date: NaiveDate::from_ymd_opt(2025, 6, 10).expect("date"),
        service_id: ServiceId::new(1).expect("service id"),
    }
}

/// Students 101 and 102 in "3ro A", student 201 in "4to B", all for 2025.
pub fn cafeteria() -> Cafeteria {
    let roster = InMemoryRosterRepository::new(vec![
        student(101, 501, "Ana", "Alvarez", "3ro A", 2025),
        student(102, 502, "Bruno", "Benitez", "3ro A", 2025),
        student(201, 601, "Carla", "Castro", "4to B", 2025),
    ]);
    let records = Arc::new(InMemoryAttendanceRecordRepository::with_known_enrollments(
        roster.enrollment_ids(),
    ));
    let services = InMemoryMealServiceRepository::new(vec![MealService {
        id: ServiceId::new(1).expect("service id"),
        name: "Almuerzo".to_owned(),
        description: Some("Turno mañana".to_owned()),
    }]);
    let clock = Arc::new(MutableClock::new(opening_time()));
    let tokens = Arc::new(InMemoryAttendanceTokenRepository::default());

    let service = AttendanceRegistrationService::new(
        AttendanceRepositories {
            tokens: Arc::clone(&tokens),
            roster: Arc::new(roster),
            services: Arc::new(services),
            records: Arc::clone(&records),
        },
        clock.clone(),
        RegistrationLinkBase::parse(FRONTEND).expect("frontend base"),
    );

    Cafeteria {
        clock,
        tokens,
        records,
        service: Arc::new(service),
    }
}

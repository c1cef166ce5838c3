//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

pub mod clock;
pub mod in_memory;

pub use clock::MutableClock;
pub use in_memory::{
    InMemoryAttendanceRecordRepository, InMemoryAttendanceTokenRepository,
    InMemoryMealServiceRepository, InMemoryRosterRepository,
};

pub mod roster {
    //! Sample roster rows.

    use crate::domain::{EnrollmentId, GradeName, PersonId, RosterStudent};

    /// Build a roster row, panicking on invalid ids.
    pub fn student(
        enrollment_id: i64,
        person_id: i64,
        first_name: &str,
        last_name: &str,
        grade: &str,
        school_year: i32,
    ) -> RosterStudent {
        let (Ok(enrollment_id), Ok(person_id), Ok(grade_name)) = (
            EnrollmentId::new(enrollment_id),
            PersonId::new(person_id),
            GradeName::new(grade),
        ) else {
            panic!("sample roster row must use valid ids");
        };
        RosterStudent {
            enrollment_id,
            person_id,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            dni: None,
            grade_name,
            school_year,
        }
    }
}

pub mod openapi {
    //! OpenAPI schema traversal helpers.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking if it is anything else.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            _ => panic!("schema '{name}' is not an Object"),
        }
    }

    /// Get a property from an Object schema by name.
    pub fn get_property<'a>(obj: &'a Object, field: &str) -> &'a RefOr<Schema> {
        match obj.properties.get(field) {
            Some(property) => property,
            None => panic!("property '{field}' not found"),
        }
    }
}

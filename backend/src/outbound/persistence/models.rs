//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{asistencias, servicios, tokens_asistencia};

/// Row read from `tokens_asistencia`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tokens_asistencia)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttendanceTokenRow {
    pub token: Uuid,
    pub id_persona_docente: i32,
    pub nombre_grado: String,
    pub id_servicio: i32,
    pub fecha: NaiveDate,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Insertable token row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tokens_asistencia)]
pub(crate) struct NewAttendanceTokenRow<'a> {
    pub token: Uuid,
    pub id_persona_docente: i32,
    pub nombre_grado: &'a str,
    pub id_servicio: i32,
    pub fecha: NaiveDate,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Roster projection of `alumno_grado` joined with `personas`.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct RosterRow {
    pub id_alumno_grado: i32,
    pub nombre_grado: String,
    pub ciclo_lectivo: i32,
    pub id_persona: i32,
    pub nombre: String,
    pub apellido: String,
    pub dni: Option<String>,
}

/// Row read from `servicios`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = servicios)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MealServiceRow {
    pub nombre: String,
    pub descripcion: Option<String>,
}

/// Row read from `asistencias`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = asistencias)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttendanceRow {
    pub id_asistencia: i32,
    pub id_servicio: i32,
    pub id_alumno_grado: i32,
    pub fecha: NaiveDate,
    pub estado: String,
}

/// Insertable attendance row used by the upsert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = asistencias)]
pub(crate) struct NewAttendanceRow<'a> {
    pub id_servicio: i32,
    pub id_alumno_grado: i32,
    pub fecha: NaiveDate,
    pub estado: &'a str,
    pub updated_at: DateTime<Utc>,
}

//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// People: students and teachers alike.
    personas (id_persona) {
        id_persona -> Int4,
        nombre -> Varchar,
        apellido -> Varchar,
        dni -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Meal services offered by the cafeteria.
    servicios (id_servicio) {
        id_servicio -> Int4,
        nombre -> Varchar,
        descripcion -> Nullable<Text>,
        activo -> Bool,
    }
}

diesel::table! {
    /// Enrollment of a person in a grade for a school year.
    alumno_grado (id_alumno_grado) {
        id_alumno_grado -> Int4,
        id_persona -> Int4,
        nombre_grado -> Varchar,
        ciclo_lectivo -> Int4,
    }
}

diesel::table! {
    /// One attendance decision per (service, enrollment, date).
    asistencias (id_asistencia) {
        id_asistencia -> Int4,
        id_servicio -> Int4,
        id_alumno_grado -> Int4,
        fecha -> Date,
        /// One of `Si`, `No`, `Ausente` (enforced by a CHECK constraint).
        estado -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Server-side attendance tokens.
    tokens_asistencia (token) {
        token -> Uuid,
        id_persona_docente -> Int4,
        nombre_grado -> Varchar,
        id_servicio -> Int4,
        fecha -> Date,
        issued_at -> Timestamptz,
        expires_at -> Timestamptz,
    }
}

diesel::joinable!(alumno_grado -> personas (id_persona));
diesel::joinable!(asistencias -> alumno_grado (id_alumno_grado));
diesel::joinable!(asistencias -> servicios (id_servicio));

diesel::allow_tables_to_appear_in_same_query!(
    alumno_grado,
    asistencias,
    personas,
    servicios,
    tokens_asistencia,
);

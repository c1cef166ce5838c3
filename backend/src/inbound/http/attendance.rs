//! Attendance registration HTTP handlers.
//!
//! ```text
//! GET  /api/asistencias/registro/{token}
//! POST /api/asistencias/registro/{token}
//! POST /api/asistencias/generar-token
//! ```
//!
//! Wire names follow the cafeteria frontend (Spanish, camelCase). Request
//! fields are optional at the serde layer so that a missing field becomes a
//! field-level `invalid_request` instead of a generic deserialisation error.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{
    GenerateTokenRequest, OpenSheetRequest, OpenSheetResponse, RegisterAttendanceRequest,
    RegisterAttendanceResponse,
};
use crate::domain::{
    AttendanceMark, AttendanceRecord, AttendanceSummary, EnrollmentId, Error, MealService,
    PersonId, RosterStudent, ServiceId, TokenScope,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, empty_batch_error, invalid_id_index_error, missing_field_index_error, parse_grade_name,
    parse_id, parse_iso_date, parse_state_at, require,
};

const ID_PERSONA_DOCENTE: FieldName = FieldName::new("idPersonaDocente");
const NOMBRE_GRADO: FieldName = FieldName::new("nombreGrado");
const FECHA: FieldName = FieldName::new("fecha");
const ID_SERVICIO: FieldName = FieldName::new("idServicio");
const ASISTENCIAS: FieldName = FieldName::new("asistencias");

const REGISTERED_MESSAGE: &str = "Asistencias registradas correctamente";
const TOKEN_MESSAGE: &str = "Token generado correctamente";

/// Request payload for minting an attendance token.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenBody {
    /// Teacher the sheet is issued to.
    #[schema(example = 7)]
    pub id_persona_docente: Option<i64>,
    /// Grade label, e.g. `3ro A`.
    #[schema(example = "3ro A")]
    pub nombre_grado: Option<String>,
    /// Service date, `YYYY-MM-DD`.
    #[schema(example = "2025-06-10")]
    pub fecha: Option<String>,
    /// Meal service the sheet records.
    #[schema(example = 1)]
    pub id_servicio: Option<i64>,
}

/// A freshly minted token and the link that opens its form.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTokenResponseBody {
    /// Confirmation shown to staff.
    pub message: String,
    /// Opaque token value.
    pub token: String,
    /// Frontend URL that opens the form.
    pub link: String,
    /// RFC 3339 expiry instant.
    pub expires_at: String,
}

/// One submitted attendance decision.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMarkBody {
    /// Enrollment being marked.
    #[schema(example = 101)]
    pub id_alumno_grado: Option<i64>,
    /// One of `Si`, `No` or `Ausente`.
    #[schema(example = "Si")]
    pub estado: Option<String>,
}

/// Request payload for a batch submission.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterAttendanceBody {
    /// Marks to store; must not be empty.
    pub asistencias: Option<Vec<AttendanceMarkBody>>,
}

/// Scope the token grants, echoed back to the form.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenDataBody {
    /// Teacher the sheet belongs to.
    pub id_persona_docente: i32,
    /// Grade whose roster is listed.
    pub nombre_grado: String,
    /// Service date, `YYYY-MM-DD`.
    pub fecha: String,
    /// Meal service being recorded.
    pub id_servicio: i32,
    /// RFC 3339 expiry instant.
    pub expires_at: String,
}

/// A student enrolled in the token's grade.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentBody {
    /// Enrollment id to submit marks against.
    pub id_alumno_grado: i32,
    /// Underlying person row.
    pub id_persona: i32,
    /// Given name.
    pub nombre: String,
    /// Family name.
    pub apellido: String,
    /// National id, when recorded.
    pub dni: Option<String>,
    /// Grade label.
    pub nombre_grado: String,
}

impl From<RosterStudent> for StudentBody {
    fn from(value: RosterStudent) -> Self {
        Self {
            id_alumno_grado: value.enrollment_id.get(),
            id_persona: value.person_id.get(),
            nombre: value.first_name,
            apellido: value.last_name,
            dni: value.dni,
            nombre_grado: value.grade_name.into(),
        }
    }
}

/// Meal service the sheet records attendance for.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealServiceBody {
    /// Service id.
    pub id_servicio: i32,
    /// Display name, e.g. `Almuerzo`.
    pub nombre: String,
    /// Optional description.
    pub descripcion: Option<String>,
}

impl From<MealService> for MealServiceBody {
    fn from(value: MealService) -> Self {
        Self {
            id_servicio: value.id.get(),
            nombre: value.name,
            descripcion: value.description,
        }
    }
}

/// A stored attendance row.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordBody {
    /// Row id.
    pub id_asistencia: i32,
    /// Meal service.
    pub id_servicio: i32,
    /// Marked enrollment.
    pub id_alumno_grado: i32,
    /// Service date, `YYYY-MM-DD`.
    pub fecha: String,
    /// Stored state.
    #[schema(example = "Ausente")]
    pub estado: String,
}

impl From<AttendanceRecord> for AttendanceRecordBody {
    fn from(value: AttendanceRecord) -> Self {
        Self {
            id_asistencia: value.id,
            id_servicio: value.service_id.get(),
            id_alumno_grado: value.enrollment_id.get(),
            fecha: value.date.to_string(),
            estado: value.state.as_str().to_owned(),
        }
    }
}

/// Per-state counts of a submitted batch.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SummaryBody {
    /// Students marked as eating.
    #[serde(rename = "Si")]
    pub si: u32,
    /// Students present but not eating.
    #[serde(rename = "No")]
    pub no: u32,
    /// Absent students.
    #[serde(rename = "Ausente")]
    pub ausente: u32,
}

impl From<AttendanceSummary> for SummaryBody {
    fn from(value: AttendanceSummary) -> Self {
        Self {
            si: value.si,
            no: value.no,
            ausente: value.ausente,
        }
    }
}

/// Everything the registration form renders.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetResponseBody {
    /// Scope of the token.
    pub token_data: TokenDataBody,
    /// Grade roster for the service date.
    pub alumnos: Vec<StudentBody>,
    /// Meal service, or a placeholder when it cannot be loaded.
    pub servicio: MealServiceBody,
    /// Marks already stored for roster students.
    pub asistencias: Vec<AttendanceRecordBody>,
}

impl From<OpenSheetResponse> for SheetResponseBody {
    fn from(value: OpenSheetResponse) -> Self {
        let OpenSheetResponse {
            scope,
            expires_at,
            students,
            service,
            records,
        } = value;
        Self {
            token_data: TokenDataBody {
                id_persona_docente: scope.teacher_id.get(),
                nombre_grado: scope.grade_name.into(),
                fecha: scope.date.to_string(),
                id_servicio: scope.service_id.get(),
                expires_at: expires_at.to_rfc3339(),
            },
            alumnos: students.into_iter().map(StudentBody::from).collect(),
            servicio: service.into(),
            asistencias: records.into_iter().map(AttendanceRecordBody::from).collect(),
        }
    }
}

/// Outcome of a batch submission.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttendanceResponseBody {
    /// Confirmation shown to the teacher.
    pub message: String,
    /// Distinct students written.
    pub registradas: usize,
    /// Stored rows, one per student.
    pub asistencias: Vec<AttendanceRecordBody>,
    /// Per-state counts of the stored rows.
    pub resumen: SummaryBody,
}

impl From<RegisterAttendanceResponse> for RegisterAttendanceResponseBody {
    fn from(value: RegisterAttendanceResponse) -> Self {
        Self {
            message: REGISTERED_MESSAGE.to_owned(),
            registradas: value.registered,
            asistencias: value
                .records
                .into_iter()
                .map(AttendanceRecordBody::from)
                .collect(),
            resumen: value.summary.into(),
        }
    }
}

fn parse_token_scope(body: GenerateTokenBody) -> Result<TokenScope, Error> {
    let teacher_id = require(body.id_persona_docente, ID_PERSONA_DOCENTE)?;
    let grade_name = require(body.nombre_grado, NOMBRE_GRADO)?;
    let date = require(body.fecha, FECHA)?;
    let service_id = require(body.id_servicio, ID_SERVICIO)?;

    Ok(TokenScope {
        teacher_id: parse_id(teacher_id, ID_PERSONA_DOCENTE, PersonId::new)?,
        grade_name: parse_grade_name(&grade_name, NOMBRE_GRADO)?,
        date: parse_iso_date(&date, FECHA)?,
        service_id: parse_id(service_id, ID_SERVICIO, ServiceId::new)?,
    })
}

fn parse_mark(index: usize, entry: AttendanceMarkBody) -> Result<AttendanceMark, Error> {
    let raw_id = entry
        .id_alumno_grado
        .ok_or_else(|| missing_field_index_error(ASISTENCIAS, index, "idAlumnoGrado"))?;
    let enrollment_id =
        EnrollmentId::new(raw_id).map_err(|_| invalid_id_index_error(ASISTENCIAS, index, raw_id))?;
    let raw_state = entry
        .estado
        .ok_or_else(|| missing_field_index_error(ASISTENCIAS, index, "estado"))?;
    let state = parse_state_at(&raw_state, ASISTENCIAS, index)?;
    Ok(AttendanceMark {
        enrollment_id,
        state,
    })
}

/// Validate the whole batch; the first bad entry rejects it.
fn parse_marks(body: RegisterAttendanceBody) -> Result<Vec<AttendanceMark>, Error> {
    let entries = require(body.asistencias, ASISTENCIAS)?;
    if entries.is_empty() {
        return Err(empty_batch_error(ASISTENCIAS));
    }
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| parse_mark(index, entry))
        .collect()
}

/// Open the attendance sheet a token grants.
#[utoipa::path(
    get,
    path = "/api/asistencias/registro/{token}",
    description = "Validate the token and return its scope, the grade roster, the meal service and marks already stored.",
    params(("token" = String, Path, description = "Attendance token from the registration link")),
    responses(
        (status = 200, description = "Attendance sheet", body = SheetResponseBody),
        (status = 401, description = "Token invalid or expired", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["asistencias"],
    operation_id = "getAttendanceSheet"
)]
#[get("/asistencias/registro/{token}")]
pub async fn get_registro(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SheetResponseBody>> {
    let sheet = state
        .sheets
        .open_sheet(OpenSheetRequest {
            token: path.into_inner(),
        })
        .await?;
    Ok(web::Json(SheetResponseBody::from(sheet)))
}

/// Upsert a batch of attendance marks for the token's sheet.
#[utoipa::path(
    post,
    path = "/api/asistencias/registro/{token}",
    description = "Validate every mark, then write the batch in one transaction. Marks for the same student replace earlier ones.",
    params(("token" = String, Path, description = "Attendance token from the registration link")),
    request_body = RegisterAttendanceBody,
    responses(
        (status = 200, description = "Batch stored", body = RegisterAttendanceResponseBody),
        (status = 400, description = "Missing, malformed or invalid marks", body = ErrorSchema),
        (status = 401, description = "Token invalid or expired", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["asistencias"],
    operation_id = "registerAttendance"
)]
#[post("/asistencias/registro/{token}")]
pub async fn post_registro(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RegisterAttendanceBody>,
) -> ApiResult<web::Json<RegisterAttendanceResponseBody>> {
    let marks = parse_marks(payload.into_inner())?;
    let response = state
        .registrations
        .register(RegisterAttendanceRequest {
            token: path.into_inner(),
            marks,
        })
        .await?;
    info!(registered = response.registered, "attendance batch stored");
    Ok(web::Json(RegisterAttendanceResponseBody::from(response)))
}

/// Mint a token and registration link for one sheet.
#[utoipa::path(
    post,
    path = "/api/asistencias/generar-token",
    request_body = GenerateTokenBody,
    responses(
        (status = 200, description = "Token issued", body = GenerateTokenResponseBody),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["asistencias"],
    operation_id = "generateAttendanceToken"
)]
#[post("/asistencias/generar-token")]
pub async fn post_generar_token(
    state: web::Data<HttpState>,
    payload: web::Json<GenerateTokenBody>,
) -> ApiResult<web::Json<GenerateTokenResponseBody>> {
    let scope = parse_token_scope(payload.into_inner())?;
    let issued = state
        .tokens
        .generate_token(GenerateTokenRequest { scope })
        .await?;
    Ok(web::Json(GenerateTokenResponseBody {
        message: TOKEN_MESSAGE.to_owned(),
        token: issued.token.to_string(),
        link: issued.link,
        expires_at: issued.expires_at.to_rfc3339(),
    }))
}

#[cfg(test)]
#[path = "attendance_tests.rs"]
mod tests;

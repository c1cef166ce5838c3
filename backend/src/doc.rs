//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the attendance and health endpoints together with
//! the error schema wrappers from [`crate::inbound::http::schemas`]. Swagger
//! UI serves it in debug builds; `cargo run --bin openapi-dump` prints it.

use utoipa::OpenApi;

use crate::inbound::http::attendance::{
    AttendanceMarkBody, AttendanceRecordBody, GenerateTokenBody, GenerateTokenResponseBody,
    MealServiceBody, RegisterAttendanceBody, RegisterAttendanceResponseBody, SheetResponseBody,
    StudentBody, SummaryBody, TokenDataBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Comedor attendance API",
        description = "Token-scoped attendance registration for the school cafeteria."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::attendance::get_registro,
        crate::inbound::http::attendance::post_registro,
        crate::inbound::http::attendance::post_generar_token,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        GenerateTokenBody,
        GenerateTokenResponseBody,
        RegisterAttendanceBody,
        AttendanceMarkBody,
        RegisterAttendanceResponseBody,
        SheetResponseBody,
        TokenDataBody,
        StudentBody,
        MealServiceBody,
        AttendanceRecordBody,
        SummaryBody,
    )),
    tags(
        (name = "asistencias", description = "Attendance tokens and registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

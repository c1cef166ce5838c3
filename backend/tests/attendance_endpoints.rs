//! End-to-end HTTP tests for the attendance endpoints over in-memory
//! adapters.

mod support;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::TimeDelta;
use rstest::rstest;
use serde_json::{Value, json};

use comedor_backend::Trace;
use comedor_backend::domain::TRACE_ID_HEADER;
use comedor_backend::inbound::http::attendance::{get_registro, post_generar_token, post_registro};
use comedor_backend::inbound::http::json_config;
use comedor_backend::inbound::http::state::HttpState;

use support::cafeteria::{Cafeteria, FRONTEND, cafeteria};

async fn send(cafeteria: &Cafeteria, request: actix_test::TestRequest) -> ServiceResponse {
    let state = HttpState::from_service(cafeteria.service.clone());
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .service(get_registro)
                    .service(post_registro)
                    .service(post_generar_token),
            ),
    )
    .await;
    actix_test::call_service(&app, request.to_request()).await
}

async fn issue_token(cafeteria: &Cafeteria) -> String {
    let response = send(
        cafeteria,
        actix_test::TestRequest::post()
            .uri("/api/asistencias/generar-token")
            .set_json(json!({
                "idPersonaDocente": 7,
                "nombreGrado": "3ro A",
                "fecha": "2025-06-10",
                "idServicio": 1,
            })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let token = body["token"].as_str().expect("token string").to_owned();
    assert_eq!(
        body["link"].as_str(),
        Some(format!("{FRONTEND}/asistencias/registro/{token}").as_str())
    );
    token
}

fn registration(token: &str, marks: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri(&format!("/api/asistencias/registro/{token}"))
        .set_json(json!({ "asistencias": marks }))
}

#[rstest]
#[actix_web::test]
async fn teacher_registers_attendance_through_a_link() {
    let cafeteria = cafeteria();
    let token = issue_token(&cafeteria).await;

    let sheet = send(
        &cafeteria,
        actix_test::TestRequest::get().uri(&format!("/api/asistencias/registro/{token}")),
    )
    .await;
    assert_eq!(sheet.status(), StatusCode::OK);
    assert!(sheet.headers().contains_key(TRACE_ID_HEADER));
    let sheet: Value = actix_test::read_body_json(sheet).await;
    assert_eq!(sheet["tokenData"]["nombreGrado"], "3ro A");
    assert_eq!(sheet["alumnos"].as_array().map(Vec::len), Some(2));
    assert_eq!(sheet["servicio"]["nombre"], "Almuerzo");
    assert_eq!(sheet["asistencias"], json!([]));

    let response = send(
        &cafeteria,
        registration(
            &token,
            json!([
                {"idAlumnoGrado": 101, "estado": "Si"},
                {"idAlumnoGrado": 102, "estado": "Ausente"},
            ]),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["registradas"], 2);
    assert_eq!(body["resumen"], json!({"Si": 1, "No": 0, "Ausente": 1}));

    let stored: Vec<_> = cafeteria
        .records
        .rows()
        .into_iter()
        .map(|row| {
            (
                row.service_id.get(),
                row.date.to_string(),
                row.enrollment_id.get(),
                row.state.as_str().to_owned(),
            )
        })
        .collect();
    assert_eq!(
        stored,
        vec![
            (1, "2025-06-10".to_owned(), 101, "Si".to_owned()),
            (1, "2025-06-10".to_owned(), 102, "Ausente".to_owned()),
        ]
    );
}

#[rstest]
#[actix_web::test]
async fn repeated_student_in_one_batch_is_reported_once() {
    let cafeteria = cafeteria();
    let token = issue_token(&cafeteria).await;

    let response = send(
        &cafeteria,
        registration(
            &token,
            json!([
                {"idAlumnoGrado": 101, "estado": "Si"},
                {"idAlumnoGrado": 101, "estado": "No"},
            ]),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["registradas"], 1);
    assert_eq!(body["asistencias"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["asistencias"][0]["estado"], "No");
    assert_eq!(body["resumen"], json!({"Si": 0, "No": 1, "Ausente": 0}));
    assert_eq!(cafeteria.records.rows().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn invalid_state_rejects_the_whole_batch() {
    let cafeteria = cafeteria();
    let token = issue_token(&cafeteria).await;

    let response = send(
        &cafeteria,
        registration(
            &token,
            json!([
                {"idAlumnoGrado": 101, "estado": "Si"},
                {"idAlumnoGrado": 102, "estado": "Maybe"},
            ]),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "invalid attendance state: Maybe");
    assert!(cafeteria.records.rows().is_empty());
}

#[rstest]
#[actix_web::test]
async fn expired_link_is_unauthorised() {
    let cafeteria = cafeteria();
    let token = issue_token(&cafeteria).await;
    cafeteria.clock.advance(TimeDelta::hours(24) + TimeDelta::seconds(1));

    let response = send(
        &cafeteria,
        registration(&token, json!([{"idAlumnoGrado": 101, "estado": "No"}])),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "token_expired");
    assert!(body["traceId"].is_string());
    assert!(cafeteria.records.rows().is_empty());
}

#[rstest]
#[case("not-a-token")]
#[case("00000000-0000-4000-8000-000000000000")]
#[actix_web::test]
async fn unknown_tokens_are_invalid(#[case] token: &str) {
    let cafeteria = cafeteria();

    let response = send(
        &cafeteria,
        actix_test::TestRequest::get().uri(&format!("/api/asistencias/registro/{token}")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "token_invalid");
}

#[rstest]
#[actix_web::test]
async fn tokens_are_reusable_until_expiry() {
    let cafeteria = cafeteria();
    let token = issue_token(&cafeteria).await;

    for state in ["Si", "No"] {
        let response = send(
            &cafeteria,
            registration(&token, json!([{"idAlumnoGrado": 101, "estado": state}])),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let rows = cafeteria.records.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.first().map(|row| row.state.as_str()), Some("No"));
    assert_eq!(cafeteria.tokens.len(), 1);
}

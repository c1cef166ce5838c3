//! Server construction, middleware wiring and background tasks.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use comedor_backend::Trace;
#[cfg(debug_assertions)]
use comedor_backend::doc::ApiDoc;
use comedor_backend::domain::TokenSweeper;
use comedor_backend::inbound::http::attendance::{get_registro, post_generar_token, post_registro};
use comedor_backend::inbound::http::health::{HealthState, live, ready};
use comedor_backend::inbound::http::json_config;
use comedor_backend::inbound::http::state::HttpState;
use comedor_backend::outbound::persistence::{DbPool, DieselAttendanceTokenRepository};
use comedor_backend::settings::TokenSweepSettings;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .service(get_registro)
        .service(post_registro)
        .service(post_generar_token);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Periodically purge long-expired tokens.
///
/// The first pass runs immediately. Failures are logged and retried on the
/// next tick.
pub fn spawn_token_sweep(pool: DbPool, settings: TokenSweepSettings) -> JoinHandle<()> {
    let sweeper = TokenSweeper::new(
        Arc::new(DieselAttendanceTokenRepository::new(pool)),
        Arc::new(DefaultClock),
        settings.retention,
    );
    info!(
        retention_days = settings.retention.num_days(),
        interval_secs = settings.interval.as_secs(),
        "token sweep enabled"
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(settings.interval);
        loop {
            ticker.tick().await;
            if let Err(error) = sweeper.purge_expired().await {
                warn!(%error, "token sweep failed");
            }
        }
    })
}

mod doc;
mod dtos;
mod error;
mod routes;
mod utils;

use axum::Router;
use axum::routing::{get, post};
use database::db::create_connection;
use database::services::student::StudentService;
use doc::ApiDoc;
use log::info;
use migration::{Migrator, MigratorTrait};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utils::shutdown::shutdown_signal;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    env_logger::init();

    let db = create_connection()
        .await
        .expect("failed to connect to the database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    StudentService::seed_lifecycle_catalog(&db)
        .await
        .expect("failed to seed lifecycle catalog");

    let app = Router::new()
        .route("/", get(routes::root::root))
        .route("/health", get(routes::health::health))
        .route("/students", post(routes::students::create_student))
        .route(
            "/students/{id}/transitions",
            post(routes::students::transition_student),
        )
        .route("/students/{id}/max-unit", get(routes::students::max_unit))
        .route("/students/{id}/progress", get(routes::students::progress))
        .route(
            "/students/{id}/bookable-sessions",
            get(routes::students::bookable_sessions),
        )
        .route("/enrollments", post(routes::enrollments::create_enrollment))
        .route("/enrollments/{id}/advance", post(routes::enrollments::advance))
        .route("/enrollments/{id}/suspend", post(routes::enrollments::suspend))
        .route(
            "/enrollments/{id}/reactivate",
            post(routes::enrollments::reactivate),
        )
        .route("/enrollments/{id}/complete", post(routes::enrollments::complete))
        .route("/enrollments/{id}/fail", post(routes::enrollments::fail))
        .route(
            "/enrollments/{id}/homologate",
            post(routes::enrollments::homologate),
        )
        .route("/sessions", post(routes::sessions::create_session))
        .route("/sessions/{id}/plan", post(routes::sessions::plan))
        .route("/sessions/{id}/publish", post(routes::sessions::publish))
        .route("/sessions/{id}/unpublish", post(routes::sessions::unpublish))
        .route("/sessions/{id}/start", post(routes::sessions::start))
        .route("/sessions/{id}/finish", post(routes::sessions::finish))
        .route("/sessions/{id}/cancel", post(routes::sessions::cancel))
        .route("/sessions/{id}/roster", get(routes::sessions::roster))
        .route("/sessions/{id}/bookings", post(routes::bookings::book))
        .route("/bookings/{id}/confirm", post(routes::bookings::confirm))
        .route("/bookings/{id}/attended", post(routes::bookings::mark_attended))
        .route("/bookings/{id}/absent", post(routes::bookings::mark_absent))
        .route("/bookings/{id}/cancel", post(routes::bookings::cancel))
        .route("/bookings/{id}/reopen", post(routes::bookings::reopen))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(db);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("failed to bind 0.0.0.0:3000");
    info!("Running axum on http://localhost:3000");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

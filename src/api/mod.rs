//! API routes for gallon-server

pub mod employee;
pub mod gallon;
pub mod health;
pub mod report;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Scan station (public)
    let scan = Router::new().route(
        "/api/gallon",
        get(gallon::lookup)
            .post(gallon::identify)
            .put(gallon::withdraw),
    );

    // Admin API
    let admin = Router::new()
        .route(
            "/api/admin/employees",
            get(employee::list_employees).post(employee::create_employee),
        )
        .route(
            "/api/admin/employees/{id}",
            get(employee::show_employee)
                .put(employee::update_employee)
                .delete(employee::delete_employee),
        )
        .route("/api/admin/reports/download", get(report::download_report));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(scan)
        .merge(admin)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

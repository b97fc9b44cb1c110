// src/lib.rs

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod models;
pub mod routes;

use config::DbConfig;
use db::QueryExecutor;

#[derive(Clone)]
pub struct AppState {
    pub executor: QueryExecutor,
}

impl AppState {
    pub fn new(db: &DbConfig) -> Self {
        Self { executor: QueryExecutor::new(db) }
    }
}

pub fn app(state: AppState) -> Router {
    // Dashboard front end is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::index::index))
        // financial
        .route("/api/financial/revenue-by-month", get(routes::financial::revenue_by_month))
        .route("/api/financial/outstanding-invoices", get(routes::financial::outstanding_invoices))
        .route("/api/financial/profit-by-service", get(routes::financial::profit_by_service))
        .route("/api/financial/currency-exposure", get(routes::financial::currency_exposure))
        .route("/api/financial/summary", get(routes::financial::summary))
        // operational
        .route("/api/operational/booking-pipeline", get(routes::operational::booking_pipeline))
        .route("/api/operational/top-routes", get(routes::operational::top_routes))
        .route(
            "/api/operational/service-distribution",
            get(routes::operational::service_distribution),
        )
        .route(
            "/api/operational/booking-value-trend",
            get(routes::operational::booking_value_trend),
        )
        .route("/api/operational/summary", get(routes::operational::summary))
        // customers
        .route("/api/customers/top-clients", get(routes::customers::top_clients))
        .route("/api/customers/segmentation", get(routes::customers::segmentation))
        .route("/api/customers/activity-trend", get(routes::customers::activity_trend))
        .route("/api/customers/summary", get(routes::customers::summary))
        // general
        .route("/api/dashboard/summary", get(routes::dashboard::summary))
        .route("/api/health", get(routes::health::health))
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// src/routes/index.rs

use axum::Json;

use crate::models::{EndpointCatalog, IndexResp};

pub async fn index() -> Json<IndexResp> {
    Json(IndexResp {
        message: "Gensoft Business Dashboard API",
        version: "1.0",
        endpoints: EndpointCatalog {
            financial: vec![
                "/api/financial/revenue-by-month",
                "/api/financial/outstanding-invoices",
                "/api/financial/profit-by-service",
                "/api/financial/currency-exposure",
                "/api/financial/summary",
            ],
            operational: vec![
                "/api/operational/booking-pipeline",
                "/api/operational/top-routes",
                "/api/operational/service-distribution",
                "/api/operational/booking-value-trend",
                "/api/operational/summary",
            ],
            customers: vec![
                "/api/customers/top-clients",
                "/api/customers/segmentation",
                "/api/customers/activity-trend",
                "/api/customers/summary",
            ],
            general: vec!["/api/dashboard/summary", "/api/health"],
        },
    })
}

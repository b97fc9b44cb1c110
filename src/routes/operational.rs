// src/routes/operational.rs

use axum::{extract::{Query, State}, Json};

use super::LimitQ;
use crate::{
    db::{Param, Statement},
    models::{list_body, object_body, Row},
    AppState,
};

const BOOKING_PIPELINE: Statement = Statement {
    name: "operational.booking_pipeline",
    sql: r#"
        SELECT
            status,
            booking_count,
            CAST(total_value AS DECIMAL(15,2)) AS total_value,
            CAST(avg_value AS DECIMAL(15,2)) AS avg_value
        FROM vw_booking_pipeline
        ORDER BY status
    "#,
};

const TOP_ROUTES: Statement = Statement {
    name: "operational.top_routes",
    sql: r#"
        SELECT
            route,
            shipment_count,
            total_containers,
            CAST(total_value AS DECIMAL(15,2)) AS total_value,
            CAST(avg_value AS DECIMAL(15,2)) AS avg_value
        FROM vw_top_routes
        LIMIT ?
    "#,
};

const SERVICE_DISTRIBUTION: Statement = Statement {
    name: "operational.service_distribution",
    sql: r#"
        SELECT
            service_type,
            booking_count,
            total_containers,
            CAST(total_revenue AS DECIMAL(15,2)) AS total_revenue,
            CAST(percentage AS DECIMAL(5,2)) AS percentage
        FROM vw_service_distribution
        ORDER BY booking_count DESC
    "#,
};

const BOOKING_VALUE_TREND: Statement = Statement {
    name: "operational.booking_value_trend",
    sql: r#"
        SELECT
            quarter,
            booking_count,
            CAST(avg_booking_value AS DECIMAL(15,2)) AS avg_booking_value,
            CAST(total_value AS DECIMAL(15,2)) AS total_value
        FROM vw_booking_value_trend
        ORDER BY quarter
    "#,
};

const SUMMARY: Statement = Statement {
    name: "operational.summary",
    sql: r#"
        SELECT
            COUNT(CASE WHEN b_status IN (0, 1) THEN 1 END) AS active_bookings,
            CAST(AVG(bk_chgs_tot_selling) AS DECIMAL(15,2)) AS avg_booking_value,
            SUM(b_n_cntr_fcl) AS total_containers,
            CAST(SUM(bk_chgs_tot_selling) AS DECIMAL(15,2)) AS pipeline_value,
            COUNT(b_id) AS total_bookings
        FROM Cago_B
        WHERE inv_cancelled_status = 0
    "#,
};

/// GET /api/operational/booking-pipeline
pub async fn booking_pipeline(State(state): State<AppState>) -> Json<Vec<Row>> {
    Json(list_body(state.executor.execute(BOOKING_PIPELINE, &[]).await))
}

/// GET /api/operational/top-routes?limit=N
pub async fn top_routes(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Row>> {
    let limit = LimitQ::from_pairs(pairs).resolve();
    Json(list_body(
        state.executor.execute(TOP_ROUTES, &[Param::Int(limit)]).await,
    ))
}

/// GET /api/operational/service-distribution
pub async fn service_distribution(State(state): State<AppState>) -> Json<Vec<Row>> {
    Json(list_body(state.executor.execute(SERVICE_DISTRIBUTION, &[]).await))
}

/// GET /api/operational/booking-value-trend
pub async fn booking_value_trend(State(state): State<AppState>) -> Json<Vec<Row>> {
    Json(list_body(state.executor.execute(BOOKING_VALUE_TREND, &[]).await))
}

/// GET /api/operational/summary
pub async fn summary(State(state): State<AppState>) -> Json<Row> {
    Json(object_body(state.executor.execute(SUMMARY, &[]).await))
}

// src/routes/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    db::Statement,
    models::{object_body, Row},
    AppState,
};

const SUMMARY: Statement = Statement {
    name: "dashboard.summary",
    sql: "SELECT * FROM vw_dashboard_summary",
};

pub async fn summary(State(state): State<AppState>) -> Json<Row> {
    Json(object_body(state.executor.execute(SUMMARY, &[]).await))
}

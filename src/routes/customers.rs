// src/routes/customers.rs

use axum::{extract::{Query, State}, Json};
use serde_json::Value;
use tracing::{info, warn};

use super::LimitQ;
use crate::{
    db::{Param, Statement},
    models::{list_body, object_body, Row},
    AppState,
};

const TOP_CLIENTS: Statement = Statement {
    name: "customers.top_clients",
    sql: r#"
        SELECT
            client_id,
            client_name,
            total_bookings,
            CAST(total_revenue AS DECIMAL(15,2)) AS total_revenue,
            CAST(estimated_ltv AS DECIMAL(15,2)) AS estimated_ltv,
            CAST(avg_invoice_value AS DECIMAL(15,2)) AS avg_invoice_value,
            first_transaction,
            last_transaction,
            customer_age_days
        FROM vw_top_clients
        LIMIT ?
    "#,
};

const SEGMENTATION: Statement = Statement {
    name: "customers.segmentation",
    sql: r#"
        SELECT
            segment,
            customer_count,
            CAST(segment_revenue AS DECIMAL(15,2)) AS segment_revenue,
            CAST(avg_customer_value AS DECIMAL(15,2)) AS avg_customer_value
        FROM vw_customer_segmentation
        ORDER BY
            CASE segment
                WHEN 'VIP (>1M)' THEN 1
                WHEN 'Premium (500K-1M)' THEN 2
                WHEN 'Standard (100K-500K)' THEN 3
                WHEN 'New (<100K)' THEN 4
            END
    "#,
};

const ACTIVITY_TREND: Statement = Statement {
    name: "customers.activity_trend",
    sql: r#"
        SELECT
            DATE_FORMAT(inv_date, '%Y-%m') AS month,
            DATE_FORMAT(MIN(inv_date), '%b %Y') AS month_name,
            DATE_FORMAT(MIN(inv_date), '%b') AS month_short,
            COUNT(DISTINCT client_id) AS total_customers
        FROM tbl_invoice
        WHERE inv_cancelled_status = 0
          AND client_id > 0
          AND inv_date IS NOT NULL
        GROUP BY DATE_FORMAT(inv_date, '%Y-%m')
        ORDER BY month DESC
        LIMIT 12
    "#,
};

const SUMMARY: Statement = Statement {
    name: "customers.summary",
    sql: r#"
        SELECT
            COUNT(DISTINCT client_id) AS total_customers,
            CAST(AVG(customer_revenue) AS DECIMAL(15,2)) AS avg_customer_value,
            (SELECT COUNT(DISTINCT client_id)
             FROM tbl_invoice
             WHERE inv_cancelled_status = 0
               AND YEAR(inv_date) = YEAR(CURDATE())) AS ytd_active_customers,
            (SELECT COUNT(DISTINCT client_id)
             FROM tbl_invoice
             WHERE inv_cancelled_status = 0
               AND inv_date >= DATE_SUB(CURDATE(), INTERVAL 3 MONTH)) AS new_customers_3m
        FROM (
            SELECT client_id, SUM(inv_tot) AS customer_revenue
            FROM tbl_invoice
            WHERE inv_cancelled_status = 0 AND client_id > 0
            GROUP BY client_id
        ) AS customer_data
    "#,
};

/// Display approximation, not a cohort computation: 30% of the month's
/// distinct customers are reported as new (at least one), the rest as repeat.
pub fn split_customers(total: i64) -> (i64, i64) {
    let new = (total * 3 / 10).max(1);
    (new, total - new)
}

fn add_new_vs_repeat(row: &mut Row) {
    let Some(total) = row.get("total_customers").and_then(Value::as_i64) else {
        warn!(?row, "activity row without integer total_customers");
        return;
    };
    let (new, repeat) = split_customers(total);
    row.insert("new_customers".into(), Value::from(new));
    row.insert("repeat_customers".into(), Value::from(repeat));
}

/// GET /api/customers/top-clients?limit=N
pub async fn top_clients(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Row>> {
    let limit = LimitQ::from_pairs(pairs).resolve();
    Json(list_body(
        state.executor.execute(TOP_CLIENTS, &[Param::Int(limit)]).await,
    ))
}

/// GET /api/customers/segmentation
pub async fn segmentation(State(state): State<AppState>) -> Json<Vec<Row>> {
    Json(list_body(state.executor.execute(SEGMENTATION, &[]).await))
}

/// GET /api/customers/activity-trend — last 12 months, oldest first
pub async fn activity_trend(State(state): State<AppState>) -> Json<Vec<Row>> {
    let mut rows = list_body(state.executor.execute(ACTIVITY_TREND, &[]).await);
    rows.reverse();
    rows.iter_mut().for_each(add_new_vs_repeat);
    info!(months = rows.len(), "customer activity trend");
    Json(rows)
}

/// GET /api/customers/summary
pub async fn summary(State(state): State<AppState>) -> Json<Row> {
    Json(object_body(state.executor.execute(SUMMARY, &[]).await))
}

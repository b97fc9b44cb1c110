// src/routes/financial.rs

use axum::{extract::State, Json};
use tracing::info;

use crate::{
    db::Statement,
    models::{list_body, object_body, Row},
    AppState,
};

const REVENUE_BY_MONTH: Statement = Statement {
    name: "financial.revenue_by_month",
    sql: r#"
        SELECT
            DATE_FORMAT(inv_date, '%Y-%m') AS month_year,
            DATE_FORMAT(MIN(inv_date), '%b %Y') AS month_name,
            COUNT(DISTINCT inv_id) AS invoice_count,
            SUM(inv_tot) AS total_revenue,
            SUM(inv_tot) * 0.25 AS estimated_profit,
            inv_def_currency AS currency
        FROM tbl_invoice
        WHERE inv_cancelled_status = 0
          AND inv_date IS NOT NULL
        GROUP BY DATE_FORMAT(inv_date, '%Y-%m'), inv_def_currency
        ORDER BY month_year DESC
        LIMIT 12
    "#,
};

const OUTSTANDING_INVOICES: Statement = Statement {
    name: "financial.outstanding_invoices",
    sql: r#"
        SELECT
            aging_category,
            COUNT(*) AS count,
            CAST(SUM(amount) AS DECIMAL(15,2)) AS total_amount,
            currency
        FROM vw_outstanding_invoices
        GROUP BY aging_category, currency
        ORDER BY
            CASE aging_category
                WHEN '0-30 days' THEN 1
                WHEN '31-60 days' THEN 2
                WHEN '61-90 days' THEN 3
                WHEN '90+ days' THEN 4
            END
    "#,
};

const PROFIT_BY_SERVICE: Statement = Statement {
    name: "financial.profit_by_service",
    sql: r#"
        SELECT
            service_type,
            invoice_count,
            CAST(total_revenue AS DECIMAL(15,2)) AS total_revenue,
            CAST(estimated_profit AS DECIMAL(15,2)) AS estimated_profit,
            CAST(profit_margin AS DECIMAL(5,2)) AS profit_margin
        FROM vw_profit_by_service
        ORDER BY total_revenue DESC
    "#,
};

const CURRENCY_EXPOSURE: Statement = Statement {
    name: "financial.currency_exposure",
    sql: r#"
        SELECT
            currency,
            transaction_count,
            CAST(total_amount AS DECIMAL(15,2)) AS total_amount,
            CAST(percentage AS DECIMAL(5,2)) AS percentage
        FROM vw_currency_exposure
        ORDER BY total_amount DESC
    "#,
};

const SUMMARY: Statement = Statement {
    name: "financial.summary",
    sql: r#"
        SELECT
            CAST(SUM(inv_tot) AS DECIMAL(15,2)) AS total_revenue,
            COUNT(DISTINCT inv_id) AS total_invoices,
            CAST(AVG(inv_tot) AS DECIMAL(15,2)) AS avg_invoice_value,
            CAST((SELECT SUM(inv_tot) FROM tbl_invoice
                  WHERE inv_cancelled_status = 0 AND acc_post = 0) AS DECIMAL(15,2)) AS outstanding_total,
            (SELECT COUNT(*) FROM tbl_invoice
             WHERE inv_cancelled_status = 0 AND acc_post = 0) AS outstanding_count,
            CAST((SELECT AVG(DATEDIFF(inv_edate, inv_date)) FROM tbl_invoice
                  WHERE inv_cancelled_status = 0 AND inv_date IS NOT NULL) AS DECIMAL(10,2)) AS avg_collection_days
        FROM tbl_invoice
        WHERE inv_cancelled_status = 0
          AND YEAR(inv_date) = YEAR(CURDATE())
    "#,
};

/// GET /api/financial/revenue-by-month — last 12 months, oldest first
pub async fn revenue_by_month(State(state): State<AppState>) -> Json<Vec<Row>> {
    let mut rows = list_body(state.executor.execute(REVENUE_BY_MONTH, &[]).await);
    rows.reverse();
    info!(months = rows.len(), "revenue by month");
    Json(rows)
}

/// GET /api/financial/outstanding-invoices
pub async fn outstanding_invoices(State(state): State<AppState>) -> Json<Vec<Row>> {
    Json(list_body(state.executor.execute(OUTSTANDING_INVOICES, &[]).await))
}

/// GET /api/financial/profit-by-service
pub async fn profit_by_service(State(state): State<AppState>) -> Json<Vec<Row>> {
    Json(list_body(state.executor.execute(PROFIT_BY_SERVICE, &[]).await))
}

/// GET /api/financial/currency-exposure
pub async fn currency_exposure(State(state): State<AppState>) -> Json<Vec<Row>> {
    Json(list_body(state.executor.execute(CURRENCY_EXPOSURE, &[]).await))
}

/// GET /api/financial/summary
pub async fn summary(State(state): State<AppState>) -> Json<Row> {
    Json(object_body(state.executor.execute(SUMMARY, &[]).await))
}

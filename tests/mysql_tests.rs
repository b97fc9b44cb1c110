//! Tests against a live MySQL server. They create and drop `tbl_invoice`,
//! fixture tables and the dashboard views in the database named by
//! `TEST_DB_NAME`, so point them at a scratch schema. Every test holds
//! `schema_lock()` for its whole run since they share those objects.
//!
//! Run with `TEST_DB_HOST=... TEST_DB_USER=... TEST_DB_PASSWORD=... TEST_DB_NAME=...
//! cargo test --test mysql_tests -- --ignored`

use std::sync::OnceLock;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use freight_dashboard_api::{app, config::DbConfig, AppState};
use serde_json::{json, Value};
use sqlx::{ConnectOptions, Connection, Executor};
use tokio::sync::{Mutex, MutexGuard};
use tower::util::ServiceExt;

async fn schema_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().await
}

fn test_config() -> Result<DbConfig> {
    let cfg = DbConfig::from_lookup(|key| {
        std::env::var(key.replacen("DB_", "TEST_DB_", 1)).ok()
    })?;
    Ok(cfg)
}

async fn seed(cfg: &DbConfig, statements: &[&str]) -> Result<()> {
    let mut conn = cfg.connect_options().connect().await?;
    for sql in statements {
        conn.execute(*sql).await?;
    }
    conn.close().await?;
    Ok(())
}

async fn get_json(cfg: &DbConfig, uri: &str) -> Result<(StatusCode, Value)> {
    let req = Request::builder().uri(uri).body(Body::empty())?;
    let response = app(AppState::new(cfg)).oneshot(req).await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

const CREATE_INVOICES: &str = r#"
    CREATE TABLE tbl_invoice (
        inv_id INT PRIMARY KEY,
        inv_date DATETIME NULL,
        inv_edate DATETIME NULL,
        inv_tot DECIMAL(15,2) NOT NULL,
        inv_def_currency VARCHAR(8) NOT NULL,
        inv_cancelled_status TINYINT NOT NULL DEFAULT 0,
        acc_post TINYINT NOT NULL DEFAULT 0,
        client_id INT NOT NULL DEFAULT 0
    )
"#;

const CREATE_ROUTES: &str = r#"
    CREATE TABLE tbl_route_fixture (
        route VARCHAR(32) NOT NULL,
        shipment_count INT NOT NULL,
        total_containers INT NOT NULL,
        total_value DECIMAL(15,2) NOT NULL,
        avg_value DECIMAL(15,2) NOT NULL
    )
"#;

#[tokio::test]
#[ignore = "needs a MySQL server"]
async fn health_is_connected() -> Result<()> {
    let (status, body) = get_json(&test_config()?, "/api/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "database": "connected"}));
    Ok(())
}

#[tokio::test]
#[ignore = "needs a MySQL server"]
async fn revenue_by_month_sums_one_month() -> Result<()> {
    let _guard = schema_lock().await;
    let cfg = test_config()?;
    seed(
        &cfg,
        &[
            "DROP TABLE IF EXISTS tbl_invoice",
            CREATE_INVOICES,
            "INSERT INTO tbl_invoice (inv_id, inv_date, inv_tot, inv_def_currency, client_id) VALUES
                (1, '2024-02-03 10:00:00', 100.00, 'USD', 7),
                (2, '2024-02-20 16:30:00', 250.50, 'USD', 8)",
            "INSERT INTO tbl_invoice (inv_id, inv_date, inv_tot, inv_def_currency, inv_cancelled_status, client_id) VALUES
                (3, '2024-02-21 09:00:00', 999.00, 'USD', 1, 9)",
        ],
    )
    .await?;

    let (status, body) = get_json(&cfg, "/api/financial/revenue-by-month").await?;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["month_year"], "2024-02");
    assert_eq!(rows[0]["invoice_count"], 2);
    assert_eq!(rows[0]["total_revenue"].as_f64(), Some(350.5));
    assert_eq!(rows[0]["currency"], "USD");

    let (_, trend) = get_json(&cfg, "/api/customers/activity-trend").await?;
    assert_eq!(trend[0]["total_customers"], 2);
    assert_eq!(trend[0]["new_customers"], 1);
    assert_eq!(trend[0]["repeat_customers"], 1);

    seed(&cfg, &["DROP TABLE tbl_invoice"]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a MySQL server"]
async fn trends_are_capped_and_ascending() -> Result<()> {
    let _guard = schema_lock().await;
    let cfg = test_config()?;
    let mut inserts = String::from(
        "INSERT INTO tbl_invoice (inv_id, inv_date, inv_tot, inv_def_currency, client_id) VALUES ",
    );
    let values: Vec<String> = (1..=15)
        .map(|i| {
            let year = 2023 + (i - 1) / 12;
            let month = (i - 1) % 12 + 1;
            format!("({i}, '{year}-{month:02}-15 00:00:00', 10.00, 'EUR', {i})")
        })
        .collect();
    inserts.push_str(&values.join(", "));
    seed(&cfg, &["DROP TABLE IF EXISTS tbl_invoice", CREATE_INVOICES, &inserts]).await?;

    for uri in ["/api/financial/revenue-by-month", "/api/customers/activity-trend"] {
        let (_, body) = get_json(&cfg, uri).await?;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 12, "{uri}");
        let key = if uri.contains("revenue") { "month_year" } else { "month" };
        let months: Vec<&str> = rows.iter().map(|r| r[key].as_str().unwrap()).collect();
        let mut sorted = months.clone();
        sorted.sort();
        assert_eq!(months, sorted, "{uri}");
        assert_eq!(months[11], "2024-03");
    }

    seed(&cfg, &["DROP TABLE tbl_invoice"]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a MySQL server"]
async fn empty_tables_give_empty_bodies() -> Result<()> {
    let _guard = schema_lock().await;
    let cfg = test_config()?;
    seed(
        &cfg,
        &[
            "DROP TABLE IF EXISTS tbl_invoice",
            CREATE_INVOICES,
            "CREATE OR REPLACE VIEW vw_top_routes AS
             SELECT 'X' AS route, 0 AS shipment_count, 0 AS total_containers,
                    0.00 AS total_value, 0.00 AS avg_value
             FROM DUAL WHERE 1 = 0",
        ],
    )
    .await?;

    for uri in [
        "/api/financial/revenue-by-month",
        "/api/customers/activity-trend",
        "/api/operational/top-routes",
    ] {
        let (status, body) = get_json(&cfg, uri).await?;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }

    // an aggregate over no rows still yields one row
    let (status, summary) = get_json(&cfg, "/api/financial/summary").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(summary.is_object());
    assert_eq!(summary["total_invoices"], 0);
    assert_eq!(summary["total_revenue"], Value::Null);

    seed(&cfg, &["DROP VIEW vw_top_routes", "DROP TABLE tbl_invoice"]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a MySQL server"]
async fn top_routes_limit_is_bound() -> Result<()> {
    let _guard = schema_lock().await;
    let cfg = test_config()?;
    let values: Vec<String> = (1..=15)
        .map(|i| format!("('R{i:02}', {i}, {i}, {i}.50, 1.25)"))
        .collect();
    let inserts = format!("INSERT INTO tbl_route_fixture VALUES {}", values.join(", "));
    seed(
        &cfg,
        &[
            "DROP TABLE IF EXISTS tbl_route_fixture",
            CREATE_ROUTES,
            &inserts,
            "CREATE OR REPLACE VIEW vw_top_routes AS
             SELECT * FROM tbl_route_fixture ORDER BY shipment_count DESC",
        ],
    )
    .await?;

    let (_, body) = get_json(&cfg, "/api/operational/top-routes?limit=3").await?;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["route"], "R15");
    assert_eq!(rows[0]["total_value"], json!(15.5));

    let (_, body) = get_json(&cfg, "/api/operational/top-routes").await?;
    assert_eq!(body.as_array().unwrap().len(), 10);

    let (_, body) = get_json(&cfg, "/api/operational/top-routes?limit=2&limit=7").await?;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) =
        get_json(&cfg, "/api/operational/top-routes?limit=1%3B%20DROP%20TABLE%20tbl_route_fixture").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 10);

    seed(&cfg, &["DROP VIEW vw_top_routes", "DROP TABLE tbl_route_fixture"]).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a MySQL server"]
async fn dates_decimals_and_flags_are_normalized() -> Result<()> {
    let _guard = schema_lock().await;
    let cfg = test_config()?;
    seed(
        &cfg,
        &[
            "DROP TABLE IF EXISTS tbl_flag_fixture",
            "CREATE TABLE tbl_flag_fixture (is_active TINYINT(1) NOT NULL)",
            "INSERT INTO tbl_flag_fixture VALUES (1)",
            "CREATE OR REPLACE VIEW vw_dashboard_summary AS
             SELECT CAST('2024-01-02 03:04:05' AS DATETIME) AS generated_at,
                    CAST(1234.56 AS DECIMAL(15,2)) AS total_revenue,
                    CAST('2024-01-02' AS DATE) AS as_of,
                    is_active
             FROM tbl_flag_fixture",
        ],
    )
    .await?;

    let (status, body) = get_json(&cfg, "/api/dashboard/summary").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generated_at"], "2024-01-02 03:04:05");
    assert_eq!(body["total_revenue"], json!(1234.56));
    assert_eq!(body["as_of"], "2024-01-02 00:00:00");
    assert_eq!(body["is_active"], json!(1));

    seed(&cfg, &["DROP VIEW vw_dashboard_summary", "DROP TABLE tbl_flag_fixture"]).await?;
    Ok(())
}

/// Rentdesk: Multi-tenant Rental Management
///
/// This library provides the core of a rental desk for small vehicle, boat
/// and property rental businesses: tenants and their staff, customers, the
/// rentable inventory, bookings with double-booking protection, invoices,
/// e-signed contracts, pickup/return inspections and commission reports for
/// owners whose items are rented out on consignment.
///
/// ### Modules
///
/// - `db`: Database connection management
/// - `models`: Data structures stored in the database
/// - `repo`: Repository layer for database operations
/// - `handlers`: HTTP handlers for the REST API
/// - `tenancy`: Resolution of the tenant a request acts for
/// - `reports`, `comparison`: Pure calculations over loaded rows
/// - `documents`, `notify`: Rendered HTML and outgoing email
///
/// ### Web API
///
/// Every route except `/health`, `/tenants` and `/public/*` requires an
/// `X-Tenant-Id` header. See `create_app` for the full route table.

/// Configuration loading
pub mod config;

/// Database connection module
pub mod db;

/// Request and response payloads
pub mod dto;

/// API and domain errors
pub mod errors;

/// HTTP handlers
pub mod handlers;

/// Logging setup
pub mod logging;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

pub mod comparison;
pub mod documents;
pub mod notify;
pub mod reports;
pub mod tenancy;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::handlers::*;
use crate::notify::Mailer;

/// Shared state handed to every handler
///
/// Handlers that only touch the database extract `State<Arc<DbPool>>`
/// through the `FromRef` impl below.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: Arc<db::DbPool>, mailer: Arc<dyn Mailer>, config: Config) -> Self {
        Self { pool, mailer, config: Arc::new(config) }
    }
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Creates the application router with all routes
///
/// This function sets up the Axum router with all the API endpoints.
///
/// ### Arguments
///
/// * `state` - The shared state: database pool, mailer and configuration
///
/// ### Returns
///
/// An Axum Router configured with all routes, CORS and request tracing
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Tenants and their staff
        .route("/tenants", post(create_tenant_handler).get(list_tenants_handler))
        .route("/tenants/{id}", get(get_tenant_handler))
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route("/users/{id}", get(get_user_handler).delete(delete_user_handler))
        // Customers
        .route("/customers", post(create_customer_handler).get(list_customers_handler))
        .route(
            "/customers/{id}",
            get(get_customer_handler).put(update_customer_handler).delete(delete_customer_handler),
        )
        .route("/customers/{id}/bookings", get(list_customer_bookings_handler))
        // Inventory and maintenance
        .route("/items", post(create_item_handler).get(list_items_handler))
        .route(
            "/items/{id}",
            get(get_item_handler).put(update_item_handler).delete(delete_item_handler),
        )
        .route("/items/{id}/bookings", get(list_item_bookings_handler))
        .route("/items/{id}/availability", get(item_availability_handler))
        .route("/items/{id}/maintenance", post(create_maintenance_handler).get(list_maintenance_handler))
        .route("/maintenance/due", get(list_due_maintenance_handler))
        // Bookings and everything hanging off them
        .route("/bookings", post(create_booking_handler).get(list_bookings_handler))
        .route(
            "/bookings/{id}",
            get(get_booking_handler).put(update_booking_handler).delete(delete_booking_handler),
        )
        .route("/bookings/{id}/status", post(update_booking_status_handler))
        .route("/bookings/{id}/invoice", post(create_invoice_handler))
        .route("/bookings/{id}/contract", post(generate_contract_handler))
        .route("/bookings/{id}/inspections", post(create_inspection_handler).get(list_inspections_handler))
        .route("/bookings/{id}/inspections/compare", get(compare_inspections_handler))
        .route("/bookings/{id}/inspections/report", get(inspection_report_handler))
        .route("/inspections/{id}", get(get_inspection_handler))
        // Money
        .route("/expenses", post(create_expense_handler).get(list_expenses_handler))
        .route("/expenses/{id}", axum::routing::delete(delete_expense_handler))
        .route("/invoices", get(list_invoices_handler))
        .route("/invoices/{id}", get(get_invoice_handler))
        .route("/invoices/{id}/pay", post(pay_invoice_handler))
        .route("/invoices/{id}/void", post(void_invoice_handler))
        // Contracts
        .route("/contracts/{id}", get(get_contract_handler))
        .route("/contracts/{id}/document", get(contract_document_handler))
        .route("/contracts/{id}/send", post(send_contract_handler))
        .route("/public/contracts/{token}", get(public_contract_handler))
        .route("/public/contracts/{token}/sign", post(sign_contract_handler))
        // Reports
        .route("/reports/commissions", get(commission_report_handler))
        .route("/reports/owners", get(owner_report_handler))
        .route("/reports/summary", get(summary_report_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the embedded migrations
///
/// This function applies all pending database migrations.
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {e}"))?;
    Ok(())
}

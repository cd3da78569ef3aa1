/// Repository module
///
/// This module provides the data access layer for the application.
/// Every function that touches tenant-owned data takes the tenant id and
/// filters on it, so a record of another tenant looks exactly like a
/// missing one.
///
/// Functions return `anyhow::Result`. Business rule violations are raised
/// as `DomainError` values inside the `anyhow::Error`, which the HTTP layer
/// recovers by downcasting.

mod tenant_repo;
mod user_repo;
mod customer_repo;
mod item_repo;
mod maintenance_repo;
mod booking_repo;
mod expense_repo;
mod invoice_repo;
mod contract_repo;
mod inspection_repo;
mod report_repo;

// Re-export all repository functions
pub use tenant_repo::*;
pub use user_repo::*;
pub use customer_repo::*;
pub use item_repo::*;
pub use maintenance_repo::*;
pub use booking_repo::*;
pub use expense_repo::*;
pub use invoice_repo::*;
pub use contract_repo::*;
pub use inspection_repo::*;
pub use report_repo::*;

/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler is responsible for processing a specific type of HTTP request,
/// resolving the tenant, validating the payload, calling the appropriate
/// repository functions, and returning a properly formatted response.

mod tenant_handlers;
mod user_handlers;
mod customer_handlers;
mod item_handlers;
mod maintenance_handlers;
mod booking_handlers;
mod expense_handlers;
mod invoice_handlers;
mod contract_handlers;
mod inspection_handlers;
mod report_handlers;

// Re-export all handlers
pub use tenant_handlers::*;
pub use user_handlers::*;
pub use customer_handlers::*;
pub use item_handlers::*;
pub use maintenance_handlers::*;
pub use booking_handlers::*;
pub use expense_handlers::*;
pub use invoice_handlers::*;
pub use contract_handlers::*;
pub use inspection_handlers::*;
pub use report_handlers::*;

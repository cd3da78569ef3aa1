/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// It includes database models that map to database tables, as well as methods
/// for creating and manipulating these models.

mod enums;
pub use enums::{
    BookingStatus, ContractStatus, ExpenseCategory, InspectionKind, InvoiceStatus, ItemKind,
    ItemStatus, UserRole,
};

mod tenant;
pub use tenant::{Tenant, is_valid_slug};

mod user;
pub use user::User;

mod customer;
pub use customer::Customer;

mod item;
pub use item::Item;

mod maintenance;
pub use maintenance::MaintenanceRecord;

mod booking;
pub use booking::{Booking, nights, ranges_overlap};

mod expense;
pub use expense::Expense;

mod invoice;
pub use invoice::{Invoice, invoice_number, invoice_number_prefix};

mod contract;
pub use contract::{Contract, SIGNING_TOKEN_LEN, generate_signing_token};

mod inspection;
pub use inspection::{Inspection, InspectionPhoto, InspectionWithPhotos};

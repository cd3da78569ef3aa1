pub mod booking;
pub mod customer;
pub mod item;
pub mod report;
pub mod tenant;

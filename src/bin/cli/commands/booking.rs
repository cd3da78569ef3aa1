use chrono::NaiveDate;
use clap::Subcommand;
use rentdesk::dto::{BookingQueryDto, CreateBookingDto};
use rentdesk::models::BookingStatus;

use crate::client::RentdeskClient;
use crate::output::{self, OutputConfig};

/// Booking management commands
#[derive(Subcommand, Debug)]
pub enum BookingCommands {
    /// List bookings
    List {
        /// Only bookings in this status; may be repeated
        #[clap(long)]
        status: Vec<BookingStatus>,
        #[clap(long)]
        item_id: Option<String>,
        #[clap(long)]
        customer_id: Option<String>,
        /// Only bookings occupying a day on or after this date
        #[clap(long)]
        from: Option<NaiveDate>,
        /// Only bookings occupying a day before this date
        #[clap(long)]
        to: Option<NaiveDate>,
    },
    /// Book an item for a customer
    Create {
        #[clap(long)]
        item_id: String,
        #[clap(long)]
        customer_id: String,
        /// First day (YYYY-MM-DD)
        #[clap(long)]
        start: NaiveDate,
        /// Hand-back day (YYYY-MM-DD)
        #[clap(long)]
        end: NaiveDate,
        /// Overrides nights × daily rate
        #[clap(long)]
        price: Option<f64>,
        #[clap(long)]
        notes: Option<String>,
    },
    /// Get a specific booking by ID
    Get {
        /// The booking ID
        id: String,
    },
    /// Move a booking to a new status
    Status {
        /// The booking ID
        id: String,
        /// confirmed, active, completed or cancelled
        status: BookingStatus,
    },
}

/// Executes a booking command
pub async fn execute(
    client: &RentdeskClient,
    cmd: BookingCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        BookingCommands::List { status, item_id, customer_id, from, to } => {
            let query = BookingQueryDto { status, item_id, customer_id, from, to };
            let bookings = client.list_bookings(&query).await?;
            output::print_bookings(&bookings, config);
        }
        BookingCommands::Create { item_id, customer_id, start, end, price, notes } => {
            let dto = CreateBookingDto {
                item_id,
                customer_id,
                start_date: start,
                end_date: end,
                total_price: price,
                notes,
            };
            let booking = client.create_booking(&dto).await?;
            output::print_booking(&booking, config);
        }
        BookingCommands::Get { id } => {
            let booking = client.get_booking(&id).await?;
            output::print_booking(&booking, config);
        }
        BookingCommands::Status { id, status } => {
            let booking = client.set_booking_status(&id, status).await?;
            output::print_booking(&booking, config);
        }
    }
    Ok(())
}

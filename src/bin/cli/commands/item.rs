use chrono::NaiveDate;
use clap::Subcommand;
use rentdesk::dto::CreateItemDto;
use rentdesk::models::{ItemKind, ItemStatus};

use crate::client::RentdeskClient;
use crate::output::{self, OutputConfig};

/// Item management commands
#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// List items, optionally filtered by kind and status
    List {
        /// vehicle, property, boat or other
        #[clap(long)]
        kind: Option<ItemKind>,
        /// available, maintenance or retired
        #[clap(long)]
        status: Option<ItemStatus>,
    },
    /// Create a new item
    Create {
        /// vehicle, property, boat or other
        #[clap(long)]
        kind: ItemKind,
        /// The item name
        #[clap(long)]
        name: String,
        /// Price per night
        #[clap(long)]
        daily_rate: f64,
        /// Licence plate or other registration
        #[clap(long)]
        registration: Option<String>,
        /// Owner of a consigned item
        #[clap(long)]
        owner: Option<String>,
        /// Share of revenue kept by the business, between 0 and 1
        #[clap(long, default_value_t = 0.0)]
        commission_rate: f64,
        /// Current odometer reading
        #[clap(long)]
        mileage: Option<i32>,
    },
    /// Get a specific item by ID
    Get {
        /// The item ID
        id: String,
    },
    /// Check whether an item is free between two dates
    Availability {
        /// The item ID
        id: String,
        /// First day (YYYY-MM-DD)
        #[clap(long)]
        start: NaiveDate,
        /// Hand-back day (YYYY-MM-DD)
        #[clap(long)]
        end: NaiveDate,
    },
}

/// Executes an item command
pub async fn execute(
    client: &RentdeskClient,
    cmd: ItemCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ItemCommands::List { kind, status } => {
            let items = client.list_items(kind, status).await?;
            output::print_items(&items, config);
        }
        ItemCommands::Create {
            kind,
            name,
            daily_rate,
            registration,
            owner,
            commission_rate,
            mileage,
        } => {
            let dto = CreateItemDto {
                kind,
                name,
                registration,
                owner_name: owner,
                commission_rate,
                daily_rate,
                mileage,
            };
            let item = client.create_item(&dto).await?;
            output::print_item(&item, config);
        }
        ItemCommands::Get { id } => {
            let item = client.get_item(&id).await?;
            output::print_item(&item, config);
        }
        ItemCommands::Availability { id, start, end } => {
            let availability = client.item_availability(&id, start, end).await?;
            output::print_availability(&availability, config);
        }
    }
    Ok(())
}

use clap::Subcommand;
use rentdesk::dto::CreateCustomerDto;

use crate::client::RentdeskClient;
use crate::output::{self, OutputConfig};

/// Customer management commands
#[derive(Subcommand, Debug)]
pub enum CustomerCommands {
    /// List customers
    List {
        /// Only customers whose name or email contains this text
        #[clap(long)]
        search: Option<String>,
    },
    /// Create a new customer
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: Option<String>,
        #[clap(long)]
        phone: Option<String>,
        /// Driving licence or ID document number
        #[clap(long)]
        license_number: Option<String>,
    },
    /// Get a specific customer by ID
    Get {
        /// The customer ID
        id: String,
    },
}

/// Executes a customer command
pub async fn execute(
    client: &RentdeskClient,
    cmd: CustomerCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        CustomerCommands::List { search } => {
            let customers = client.list_customers(search.as_deref()).await?;
            output::print_customers(&customers, config);
        }
        CustomerCommands::Create { name, email, phone, license_number } => {
            let dto = CreateCustomerDto {
                name,
                email,
                phone,
                license_number,
                ..Default::default()
            };
            let customer = client.create_customer(&dto).await?;
            output::print_customer(&customer, config);
        }
        CustomerCommands::Get { id } => {
            let customer = client.get_customer(&id).await?;
            output::print_customer(&customer, config);
        }
    }
    Ok(())
}

use clap::Subcommand;

use crate::client::RentdeskClient;
use crate::output::{self, OutputConfig};

/// Tenant management commands
#[derive(Subcommand, Debug)]
pub enum TenantCommands {
    /// List all tenants
    List,
    /// Create a new tenant
    Create {
        /// Display name of the business
        #[clap(long)]
        name: String,
        /// Unique handle: lowercase letters, digits and dashes
        #[clap(long)]
        slug: String,
    },
}

/// Executes a tenant command
pub async fn execute(
    client: &RentdeskClient,
    cmd: TenantCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TenantCommands::List => {
            let tenants = client.list_tenants().await?;
            output::print_tenants(&tenants, config);
        }
        TenantCommands::Create { name, slug } => {
            let tenant = client.create_tenant(name, slug).await?;
            output::print_tenant(&tenant, config);
        }
    }
    Ok(())
}

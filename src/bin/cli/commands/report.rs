use chrono::NaiveDate;
use clap::Subcommand;

use crate::client::RentdeskClient;
use crate::output::{self, OutputConfig};

/// Reporting commands; periods are `[from, to)` by booking start date
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Revenue, commission and owner payout per month and item
    Commissions {
        #[clap(long)]
        from: NaiveDate,
        #[clap(long)]
        to: NaiveDate,
    },
    /// Tenant-wide totals
    Summary {
        #[clap(long)]
        from: NaiveDate,
        #[clap(long)]
        to: NaiveDate,
    },
}

/// Executes a report command
pub async fn execute(
    client: &RentdeskClient,
    cmd: ReportCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ReportCommands::Commissions { from, to } => {
            let lines = client.commission_report(from, to).await?;
            output::print_commissions(&lines, config);
        }
        ReportCommands::Summary { from, to } => {
            let summary = client.summary_report(from, to).await?;
            output::print_summary(&summary, config);
        }
    }
    Ok(())
}

mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use client::RentdeskClient;
use output::{OutputConfig, OutputFormat};
use rentdesk::config::{self, ConfigUpdate};
use std::process;

/// CLI for the rentdesk rental management server
#[derive(Parser, Debug)]
#[clap(name = "rentdesk-cli", about = "CLI for the rentdesk rental management server")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "RENTDESK_URL", global = true)]
    server_url: Option<String>,

    /// Tenant ID sent with every request
    #[clap(long, env = "RENTDESK_TENANT", global = true)]
    tenant: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage tenants
    #[command(subcommand)]
    Tenant(commands::tenant::TenantCommands),
    /// Manage items
    #[command(subcommand)]
    Item(commands::item::ItemCommands),
    /// Manage customers
    #[command(subcommand)]
    Customer(commands::customer::CustomerCommands),
    /// Manage bookings
    #[command(subcommand)]
    Booking(commands::booking::BookingCommands),
    /// Revenue and commission reports
    #[command(subcommand)]
    Report(commands::report::ReportCommands),
}

/// Reads the shared config file, if there is one
fn file_config() -> ConfigUpdate {
    config::get_config_dir_path()
        .map(|dir| dir.join(config::CONFIG_FILE_NAME))
        .and_then(|path| config::config_from_file(Some(path)).ok())
        .unwrap_or_default()
}

/// Resolves the server URL and tenant from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_connection(cli_url: Option<String>, cli_tenant: Option<String>) -> (String, Option<String>) {
    if let (Some(url), Some(tenant)) = (&cli_url, &cli_tenant) {
        return (url.clone(), Some(tenant.clone()));
    }

    let file = file_config();
    let url = cli_url
        .or(file.server_url)
        .unwrap_or_else(|| "http://localhost:3000".to_string());
    (url, cli_tenant.or(file.tenant))
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    // Connection failures surface as reqwest errors
    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!("Could not connect to server. Is rentdesk running?\n  {}", err_string);
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let (server_url, tenant) = resolve_connection(cli.server_url, cli.tenant);
    let client = RentdeskClient::new(server_url, tenant);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Tenant(cmd) => commands::tenant::execute(&client, cmd, &output_config).await,
        Commands::Item(cmd) => commands::item::execute(&client, cmd, &output_config).await,
        Commands::Customer(cmd) => commands::customer::execute(&client, cmd, &output_config).await,
        Commands::Booking(cmd) => commands::booking::execute(&client, cmd, &output_config).await,
        Commands::Report(cmd) => commands::report::execute(&client, cmd, &output_config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}

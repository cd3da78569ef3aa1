use clap::ValueEnum;
use rentdesk::dto::AvailabilityDto;
use rentdesk::models::{Booking, Customer, Item, Tenant};
use rentdesk::reports::{CommissionLine, RevenueSummary};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs)
    pub quiet: bool,
}

/// Prints any serializable value as pretty JSON
fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Could not encode output: {}", e),
    }
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Prints rows as left-aligned columns under a header
fn print_table(header: &[&str], rows: &[Vec<String>]) {
    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].len())
                .chain(std::iter::once(header[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!("{}", format_row(header, &widths));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        println!("{}", format_row(&cells, &widths));
    }
}

/// Shared list printing: empty notice, quiet ids, or a table
fn print_list<T: Serialize>(
    entries: &[T],
    noun: &str,
    config: &OutputConfig,
    id: impl Fn(&T) -> String,
    header: &[&str],
    row: impl Fn(&T) -> Vec<String>,
) {
    match config.format {
        OutputFormat::Human => {
            if entries.is_empty() {
                if !config.quiet {
                    println!("No {} found.", noun);
                }
                return;
            }
            if config.quiet {
                for entry in entries {
                    println!("{}", id(entry));
                }
                return;
            }
            let rows: Vec<Vec<String>> = entries.iter().map(row).collect();
            print_table(header, &rows);
        }
        OutputFormat::Json => print_json(entries),
    }
}

/// Prints a list of tenants in the specified format
pub fn print_tenants(tenants: &[Tenant], config: &OutputConfig) {
    print_list(tenants, "tenants", config, Tenant::get_id, &["ID", "SLUG", "NAME"], |t| {
        vec![t.get_id(), t.get_slug(), t.get_name()]
    });
}

/// Prints a single tenant in the specified format
pub fn print_tenant(tenant: &Tenant, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human if config.quiet => println!("{}", tenant.get_id()),
        OutputFormat::Human => {
            println!("ID:      {}", tenant.get_id());
            println!("Name:    {}", tenant.get_name());
            println!("Slug:    {}", tenant.get_slug());
            println!("Created: {}", tenant.get_created_at());
        }
        OutputFormat::Json => print_json(tenant),
    }
}

/// Prints a list of items in the specified format
pub fn print_items(items: &[Item], config: &OutputConfig) {
    print_list(
        items,
        "items",
        config,
        Item::get_id,
        &["ID", "KIND", "NAME", "STATUS", "DAILY RATE", "OWNER"],
        |i| {
            vec![
                i.get_id(),
                i.get_kind().to_string(),
                i.get_name(),
                i.get_status().to_string(),
                format!("{:.2}", i.get_daily_rate()),
                or_dash(i.get_owner_name()),
            ]
        },
    );
}

/// Prints a single item in the specified format
pub fn print_item(item: &Item, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human if config.quiet => println!("{}", item.get_id()),
        OutputFormat::Human => {
            println!("ID:           {}", item.get_id());
            println!("Kind:         {}", item.get_kind());
            println!("Name:         {}", item.get_name());
            println!("Registration: {}", or_dash(item.get_registration()));
            println!("Status:       {}", item.get_status());
            println!("Daily rate:   {:.2}", item.get_daily_rate());
            println!("Owner:        {}", or_dash(item.get_owner_name()));
            println!("Commission:   {:.0}%", item.get_commission_rate() * 100.0);
            println!("Mileage:      {}", or_dash(item.get_mileage().map(|m| m.to_string())));
        }
        OutputFormat::Json => print_json(item),
    }
}

/// Prints the result of an availability check
pub fn print_availability(availability: &AvailabilityDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if availability.available {
                println!("Available.");
                return;
            }
            println!("Not available. Conflicting bookings:");
            for booking in &availability.conflicts {
                println!(
                    "  {}  {} .. {}  {}",
                    booking.get_id(),
                    booking.get_start_date(),
                    booking.get_end_date(),
                    booking.get_status()
                );
            }
        }
        OutputFormat::Json => print_json(availability),
    }
}

/// Prints a list of customers in the specified format
pub fn print_customers(customers: &[Customer], config: &OutputConfig) {
    print_list(customers, "customers", config, Customer::get_id, &["ID", "NAME", "EMAIL", "PHONE"], |c| {
        vec![c.get_id(), c.get_name(), or_dash(c.get_email()), or_dash(c.get_phone())]
    });
}

/// Prints a single customer in the specified format
pub fn print_customer(customer: &Customer, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human if config.quiet => println!("{}", customer.get_id()),
        OutputFormat::Human => {
            println!("ID:      {}", customer.get_id());
            println!("Name:    {}", customer.get_name());
            println!("Email:   {}", or_dash(customer.get_email()));
            println!("Phone:   {}", or_dash(customer.get_phone()));
            println!("License: {}", or_dash(customer.get_license_number()));
        }
        OutputFormat::Json => print_json(customer),
    }
}

/// Prints a list of bookings in the specified format
pub fn print_bookings(bookings: &[Booking], config: &OutputConfig) {
    print_list(
        bookings,
        "bookings",
        config,
        Booking::get_id,
        &["ID", "START", "END", "STATUS", "TOTAL"],
        |b| {
            vec![
                b.get_id(),
                b.get_start_date().to_string(),
                b.get_end_date().to_string(),
                b.get_status().to_string(),
                format!("{:.2}", b.get_total_price()),
            ]
        },
    );
}

/// Prints a single booking in the specified format
pub fn print_booking(booking: &Booking, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human if config.quiet => println!("{}", booking.get_id()),
        OutputFormat::Human => {
            println!("ID:       {}", booking.get_id());
            println!("Item:     {}", booking.get_item_id());
            println!("Customer: {}", booking.get_customer_id());
            println!("Dates:    {} .. {} ({} nights)", booking.get_start_date(), booking.get_end_date(), booking.get_nights());
            println!("Status:   {}", booking.get_status());
            println!("Total:    {:.2}", booking.get_total_price());
            println!("Notes:    {}", or_dash(booking.get_notes()));
        }
        OutputFormat::Json => print_json(booking),
    }
}

/// Prints commission lines in the specified format
pub fn print_commissions(lines: &[CommissionLine], config: &OutputConfig) {
    print_list(
        lines,
        "commission lines",
        config,
        |l| l.item_id.clone(),
        &["MONTH", "OWNER", "ITEM", "BOOKINGS", "REVENUE", "COMMISSION", "EXPENSES", "PAYOUT"],
        |l| {
            vec![
                l.month.clone(),
                or_dash(l.owner_name.clone()),
                l.item_name.clone(),
                l.bookings.to_string(),
                format!("{:.2}", l.revenue),
                format!("{:.2}", l.commission),
                format!("{:.2}", l.expenses),
                format!("{:.2}", l.owner_payout),
            ]
        },
    );
}

/// Prints a revenue summary in the specified format
pub fn print_summary(summary: &RevenueSummary, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            println!("Period:     {} .. {}", summary.from, summary.to);
            println!("Bookings:   {}", summary.bookings);
            println!("Revenue:    {:.2}", summary.revenue);
            println!("Commission: {:.2}", summary.commission);
            println!("Expenses:   {:.2}", summary.expenses);
            println!("Net:        {:.2}", summary.net);
        }
        OutputFormat::Json => print_json(summary),
    }
}

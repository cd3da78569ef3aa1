//! Revenue and commission accounting
//!
//! Everything here works on rows already loaded from the database, so the
//! arithmetic can be tested without one. A booking's whole price is
//! attributed to the month its stay starts in, and only bookings whose
//! status counts as revenue contribute.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Booking, Expense, Item};

/// Revenue, commission and expenses of one item in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionLine {
    /// Calendar month as `YYYY-MM`
    pub month: String,
    pub owner_name: Option<String>,
    pub item_id: String,
    pub item_name: String,
    pub bookings: u32,
    pub revenue: f64,
    pub commission_rate: f64,
    /// The tenant's share of the revenue
    pub commission: f64,
    /// Expenses attributed to the item in the month
    pub expenses: f64,
    /// What is owed to the owner: revenue minus commission and expenses
    pub owner_payout: f64,
}

/// Totals for one owner across every item and month in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerStatement {
    pub owner_name: Option<String>,
    pub items: u32,
    pub bookings: u32,
    pub revenue: f64,
    pub commission: f64,
    pub expenses: f64,
    pub owner_payout: f64,
}

/// Tenant-wide totals for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub bookings: u32,
    pub revenue: f64,
    pub commission: f64,
    pub expenses: f64,
    /// Revenue minus every expense of the tenant in the period
    pub net: f64,
}

/// Rounds a money amount to whole cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// `YYYY-MM` key of the month containing `date`
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[derive(Default)]
struct LineTotals {
    owner_name: Option<String>,
    item_name: String,
    commission_rate: f64,
    bookings: u32,
    revenue: f64,
    expenses: f64,
}

type LineKey = (String, String);

fn line_for<'a>(totals: &'a mut BTreeMap<LineKey, LineTotals>, month: String, item: &Item) -> &'a mut LineTotals {
    totals.entry((month, item.get_id())).or_insert_with(|| LineTotals {
        owner_name: item.get_owner_name(),
        item_name: item.get_name(),
        commission_rate: item.get_commission_rate(),
        ..Default::default()
    })
}

/// Groups bookings and item expenses into one line per (month, owner, item)
///
/// Bookings whose status does not count as revenue are ignored. An item
/// with expenses but no revenue in a month still gets a line, with a
/// negative payout. Lines are ordered by month, then owner, then item name.
pub fn aggregate_commissions(bookings: &[(Booking, Item)], expenses: &[(Expense, Item)]) -> Vec<CommissionLine> {
    let mut totals: BTreeMap<LineKey, LineTotals> = BTreeMap::new();

    for (booking, item) in bookings {
        if !booking.get_status().counts_as_revenue() {
            continue;
        }
        let line = line_for(&mut totals, month_key(booking.get_start_date()), item);
        line.bookings += 1;
        line.revenue += booking.get_total_price();
    }

    for (expense, item) in expenses {
        let line = line_for(&mut totals, month_key(expense.get_incurred_on()), item);
        line.expenses += expense.get_amount();
    }

    let mut lines: Vec<CommissionLine> = totals
        .into_iter()
        .map(|((month, item_id), t)| {
            let revenue = round_cents(t.revenue);
            let expenses = round_cents(t.expenses);
            let commission = round_cents(revenue * t.commission_rate);
            CommissionLine {
                month,
                owner_name: t.owner_name,
                item_id,
                item_name: t.item_name,
                bookings: t.bookings,
                revenue,
                commission_rate: t.commission_rate,
                commission,
                expenses,
                owner_payout: round_cents(revenue - commission - expenses),
            }
        })
        .collect();

    lines.sort_by(|a, b| {
        (&a.month, &a.owner_name, &a.item_name, &a.item_id)
            .cmp(&(&b.month, &b.owner_name, &b.item_name, &b.item_id))
    });
    lines
}

/// Sums commission lines per owner; items without an owner share the `None` entry
pub fn summarize_by_owner(lines: &[CommissionLine]) -> Vec<OwnerStatement> {
    let mut by_owner: BTreeMap<Option<String>, (OwnerStatement, Vec<&str>)> = BTreeMap::new();

    for line in lines {
        let (statement, items) = by_owner.entry(line.owner_name.clone()).or_insert_with(|| {
            (
                OwnerStatement {
                    owner_name: line.owner_name.clone(),
                    items: 0,
                    bookings: 0,
                    revenue: 0.0,
                    commission: 0.0,
                    expenses: 0.0,
                    owner_payout: 0.0,
                },
                Vec::new(),
            )
        });
        if !items.contains(&line.item_id.as_str()) {
            items.push(&line.item_id);
        }
        statement.bookings += line.bookings;
        statement.revenue += line.revenue;
        statement.commission += line.commission;
        statement.expenses += line.expenses;
        statement.owner_payout += line.owner_payout;
    }

    by_owner
        .into_values()
        .map(|(mut statement, items)| {
            statement.items = items.len() as u32;
            statement.revenue = round_cents(statement.revenue);
            statement.commission = round_cents(statement.commission);
            statement.expenses = round_cents(statement.expenses);
            statement.owner_payout = round_cents(statement.owner_payout);
            statement
        })
        .collect()
}

/// Tenant-wide totals: revenue and commission from the lines, expenses from
/// every expense in the period whether or not it is tied to an item
pub fn summarize(from: NaiveDate, to: NaiveDate, lines: &[CommissionLine], all_expenses: &[Expense]) -> RevenueSummary {
    let revenue = round_cents(lines.iter().map(|l| l.revenue).sum());
    let commission = round_cents(lines.iter().map(|l| l.commission).sum());
    let expenses = round_cents(all_expenses.iter().map(Expense::get_amount).sum());

    RevenueSummary {
        from,
        to,
        bookings: lines.iter().map(|l| l.bookings).sum(),
        revenue,
        commission,
        expenses,
        net: round_cents(revenue - expenses),
    }
}


#[cfg(test)]
mod prop_tests;

use super::*;
use crate::models::{BookingStatus, ItemKind};
use proptest::prelude::*;

/// Generates a completed or cancelled booking priced in whole cents
fn arb_booking_row(items: Vec<Item>) -> impl Strategy<Value = (Booking, Item)> {
    (0..items.len(), 0i64..365, 1i64..14, 0u32..500_000, any::<bool>()).prop_map(
        move |(idx, offset, len, cents, completed)| {
            let item = items[idx].clone();
            let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + chrono::Duration::days(offset);
            let mut booking = Booking::new(
                "t".to_string(),
                item.get_id(),
                "c".to_string(),
                start,
                start + chrono::Duration::days(len),
                f64::from(cents) / 100.0,
                None,
            );
            booking.set_status(if completed { BookingStatus::Completed } else { BookingStatus::Cancelled });
            (booking, item)
        },
    )
}

fn fixed_items() -> Vec<Item> {
    vec![
        Item::new("t".to_string(), ItemKind::Vehicle, "Golf".to_string(), 40.0)
            .with_owner(Some("Alice".to_string()), 0.15),
        Item::new("t".to_string(), ItemKind::Boat, "Sea Breeze".to_string(), 250.0)
            .with_owner(Some("Bob".to_string()), 0.3),
        Item::new("t".to_string(), ItemKind::Property, "Loft".to_string(), 90.0),
    ]
}

proptest! {
    /// Total line revenue equals the summed price of revenue bookings
    #[test]
    fn prop_revenue_is_conserved(rows in prop::collection::vec(arb_booking_row(fixed_items()), 0..40)) {
        let expected: f64 = rows
            .iter()
            .filter(|(b, _)| b.get_status().counts_as_revenue())
            .map(|(b, _)| b.get_total_price())
            .sum();
        let lines = aggregate_commissions(&rows, &[]);
        let total: f64 = lines.iter().map(|l| l.revenue).sum();
        prop_assert!((total - expected).abs() < 0.01, "total {} expected {}", total, expected);
    }

    /// Commission, payout and expenses add back up to revenue on every line
    #[test]
    fn prop_line_parts_sum_to_revenue(rows in prop::collection::vec(arb_booking_row(fixed_items()), 0..40)) {
        for line in aggregate_commissions(&rows, &[]) {
            let parts = line.commission + line.owner_payout + line.expenses;
            prop_assert!((parts - line.revenue).abs() < 0.011, "line {:?}", line);
        }
    }

    /// Owner statements carry the same revenue as the lines they summarize
    #[test]
    fn prop_owner_totals_match_lines(rows in prop::collection::vec(arb_booking_row(fixed_items()), 0..40)) {
        let lines = aggregate_commissions(&rows, &[]);
        let statements = summarize_by_owner(&lines);
        let line_total: f64 = lines.iter().map(|l| l.revenue).sum();
        let owner_total: f64 = statements.iter().map(|s| s.revenue).sum();
        let line_bookings: u32 = lines.iter().map(|l| l.bookings).sum();
        let owner_bookings: u32 = statements.iter().map(|s| s.bookings).sum();
        prop_assert!((line_total - owner_total).abs() < 0.01);
        prop_assert_eq!(line_bookings, owner_bookings);
    }
}

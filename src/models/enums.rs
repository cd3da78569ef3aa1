use diesel::deserialize::{FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a fieldless enum stored as TEXT, with its snake_case wire and
/// column representation
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
        #[diesel(sql_type = Text)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("invalid {}: {}", stringify!($name), other)),
                }
            }
        }

        impl FromSql<Text, Sqlite> for $name {
            fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
                let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
                Ok(text.parse::<$name>()?)
            }
        }

        impl ToSql<Text, Sqlite> for $name {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
                out.set_value(self.as_str().to_string());
                Ok(IsNull::No)
            }
        }
    };
}

text_enum! {
    /// Role of a staff user within a tenant
    pub enum UserRole {
        Owner => "owner",
        Manager => "manager",
        Staff => "staff",
    }
}

text_enum! {
    /// What kind of asset an item is
    pub enum ItemKind {
        Vehicle => "vehicle",
        Property => "property",
        Boat => "boat",
        Other => "other",
    }
}

text_enum! {
    /// Operational status of an item
    pub enum ItemStatus {
        Available => "available",
        Maintenance => "maintenance",
        /// No longer rentable; kept for history
        Retired => "retired",
    }
}

text_enum! {
    /// Lifecycle status of a booking
    pub enum BookingStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Active => "active",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl BookingStatus {
    /// Statuses that hold the item's calendar
    pub const BLOCKING: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Active,
    ];

    /// Statuses whose price counts as revenue
    pub const REVENUE: [BookingStatus; 3] = [
        BookingStatus::Confirmed,
        BookingStatus::Active,
        BookingStatus::Completed,
    ];

    pub fn is_blocking(&self) -> bool {
        Self::BLOCKING.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    pub fn counts_as_revenue(&self) -> bool {
        Self::REVENUE.contains(self)
    }

    /// Whether a booking in this status may move to `next`
    ///
    /// The forward path is pending → confirmed → active → completed. Any
    /// non-terminal booking may be cancelled; terminal bookings never move.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Active)
                | (Active, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Active, Cancelled)
        )
    }
}

text_enum! {
    /// Category of an expense
    pub enum ExpenseCategory {
        Fuel => "fuel",
        Maintenance => "maintenance",
        Insurance => "insurance",
        Cleaning => "cleaning",
        Tax => "tax",
        Other => "other",
    }
}

text_enum! {
    /// Payment status of an invoice
    pub enum InvoiceStatus {
        Unpaid => "unpaid",
        Paid => "paid",
        Void => "void",
    }
}

text_enum! {
    /// Signature status of a contract
    pub enum ContractStatus {
        Draft => "draft",
        Sent => "sent",
        Signed => "signed",
    }
}

text_enum! {
    /// Whether an inspection was taken when the item left or came back
    pub enum InspectionKind {
        Pickup => "pickup",
        Return => "return",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip_through_from_str() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), *status);
        }
        for kind in ItemKind::ALL {
            assert_eq!(kind.to_string().parse::<ItemKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_unknown_text_is_rejected() {
        let err = "archived".parse::<BookingStatus>().unwrap_err();
        assert!(err.contains("archived"));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&InspectionKind::Pickup).unwrap();
        assert_eq!(json, "\"pickup\"");
        let parsed: ExpenseCategory = serde_json::from_str("\"insurance\"").unwrap();
        assert_eq!(parsed, ExpenseCategory::Insurance);
    }

    #[test]
    fn test_terminal_statuses_have_no_exits() {
        for from in [BookingStatus::Completed, BookingStatus::Cancelled] {
            for to in BookingStatus::ALL {
                assert!(!from.can_transition_to(*to), "{} -> {} should be rejected", from, to);
            }
        }
    }

    #[test]
    fn test_every_open_status_can_be_cancelled() {
        for from in BookingStatus::BLOCKING {
            assert!(from.can_transition_to(BookingStatus::Cancelled));
        }
    }

    #[test]
    fn test_forward_path_only() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Active));
        assert!(!BookingStatus::Active.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Confirmed));
    }
}

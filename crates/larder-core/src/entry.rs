use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::ContextId;

/// An inventory entry as it goes into the store. The quantity is always
/// the result of a successful lexical parse; lines that fail never reach
/// this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub context_id: ContextId,
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    pub date: NaiveDate,
}

/// A stored inventory entry. `id` is the store rowid and carries no
/// meaning beyond identity; `created_at` orders same-date entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub context_id: ContextId,
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    pub date: NaiveDate,
    pub created_at: String,
}

/// Render a quantity for display: thousands separators, at most two
/// decimals, no trailing zeros. Quantities are non-negative by
/// construction (the line parser rejects signs).
pub fn format_quantity(quantity: f64) -> String {
    let cents = (quantity * 100.0).round() as i64;
    let whole = group_thousands(cents / 100);
    match (cents % 100) as u8 {
        0 => whole,
        f if f % 10 == 0 => format!("{whole}.{}", f / 10),
        f => format!("{whole}.{f:02}"),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_quantities_have_no_fraction() {
        assert_eq!(format_quantity(8.0), "8");
        assert_eq!(format_quantity(0.0), "0");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_quantity(1200.0), "1,200");
        assert_eq!(format_quantity(1234567.0), "1,234,567");
    }

    #[test]
    fn fractions_are_trimmed() {
        assert_eq!(format_quantity(3.5), "3.5");
        assert_eq!(format_quantity(0.25), "0.25");
        assert_eq!(format_quantity(1234.5), "1,234.5");
    }

    #[test]
    fn fractions_round_to_two_decimals() {
        assert_eq!(format_quantity(0.125), "0.13");
        assert_eq!(format_quantity(2.999), "3");
    }

    #[test]
    fn entry_serde_roundtrip() {
        let entry = LedgerEntry {
            id: 1,
            context_id: ContextId::from_raw("C123"),
            item: "หมู".into(),
            quantity: 5.0,
            unit: "กก".into(),
            date: NaiveDate::from_ymd_opt(2025, 7, 26).unwrap(),
            created_at: "2025-07-26T09:00:00+00:00".into(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, parsed);
    }
}

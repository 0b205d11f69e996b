// Rent arithmetic for bookings and extensions. Amounts are whole Rupiah.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::draft::PaymentType;

/// Share of the total paid up front under the down-payment option, in tenths.
pub const DOWN_PAYMENT_TENTHS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub total: u64,
    pub due_now: u64,
    pub deferred: u64,
}

pub fn total_due(monthly_price: u64, duration_months: u32) -> u64 {
    monthly_price.saturating_mul(duration_months as u64)
}

/// Split the total for the chosen payment type. The parts always sum to the total.
pub fn breakdown(monthly_price: u64, duration_months: u32, payment_type: PaymentType) -> PaymentBreakdown {
    let total = total_due(monthly_price, duration_months);
    let due_now = match payment_type {
        PaymentType::Full => total,
        PaymentType::DownPayment => down_payment(total),
    };

    PaymentBreakdown {
        total,
        due_now,
        deferred: total - due_now,
    }
}

pub fn down_payment(total: u64) -> u64 {
    // u128 so that very large totals do not overflow before the division
    ((total as u128 * DOWN_PAYMENT_TENTHS as u128) / 10) as u64
}

/// Calendar month arithmetic with the backend's overflow rule: a day past
/// the end of the target month rolls into the next one (Jan 31 + 1 = Mar 3).
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let first = date.with_day(1)?.checked_add_months(Months::new(months))?;
    first.checked_add_days(Days::new(u64::from(date.day0())))
}

/// The remaining 70% of a down-payment booking falls due one month after move-in.
pub fn balance_due_date(move_in: NaiveDate) -> Option<NaiveDate> {
    add_months(move_in, 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionQuote {
    pub months: u32,
    pub cost: u64,
    pub new_end_date: Option<NaiveDate>,
}

pub fn extension_quote(monthly_price: u64, months: u32, current_end: Option<NaiveDate>) -> ExtensionQuote {
    ExtensionQuote {
        months,
        cost: total_due(monthly_price, months),
        new_end_date: current_end.and_then(|end| add_months(end, months)),
    }
}

/// Render an amount the way id-ID locales print Rupiah, e.g. `Rp 9.000.000`.
pub fn format_idr(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_full_and_down_payment_for_six_months() {
        let full = breakdown(1_500_000, 6, PaymentType::Full);
        assert_eq!(full.total, 9_000_000);
        assert_eq!(full.due_now, 9_000_000);
        assert_eq!(full.deferred, 0);

        let dp = breakdown(1_500_000, 6, PaymentType::DownPayment);
        assert_eq!(dp.total, 9_000_000);
        assert_eq!(dp.due_now, 2_700_000);
        assert_eq!(dp.deferred, 6_300_000);
    }

    #[test_case(850_000, 1, 850_000, 255_000; "#1 single month")]
    #[test_case(1_200_000, 12, 14_400_000, 4_320_000; "#2 full year")]
    #[test_case(0, 6, 0, 0; "#3 unpriced room")]
    #[test_case(333_333, 1, 333_333, 99_999; "#4 remainder stays in the deferred part")]
    fn test_down_payment_split(price: u64, months: u32, total: u64, now: u64) {
        let dp = breakdown(price, months, PaymentType::DownPayment);
        assert_eq!(dp.total, total);
        assert_eq!(dp.due_now, now);
        assert_eq!(dp.due_now + dp.deferred, dp.total);
    }

    #[test_case((2025, 7, 1), (2025, 8, 1); "#1 plain month")]
    #[test_case((2025, 1, 31), (2025, 3, 3); "#2 rolls past short february")]
    #[test_case((2024, 1, 31), (2024, 3, 2); "#3 leap year")]
    #[test_case((2025, 12, 15), (2026, 1, 15); "#4 year boundary")]
    #[test_case((2025, 3, 31), (2025, 5, 1); "#5 thirty day month")]
    fn test_balance_due_date(move_in: (i32, u32, u32), due: (i32, u32, u32)) {
        let move_in = NaiveDate::from_ymd_opt(move_in.0, move_in.1, move_in.2).unwrap();
        assert_eq!(
            balance_due_date(move_in),
            NaiveDate::from_ymd_opt(due.0, due.1, due.2)
        );
    }

    #[test]
    fn test_extension_quote() {
        let end = NaiveDate::from_ymd_opt(2025, 6, 1);
        let quote = extension_quote(1_000_000, 3, end);
        assert_eq!(quote.cost, 3_000_000);
        assert_eq!(quote.new_end_date, NaiveDate::from_ymd_opt(2025, 9, 1));

        let from_month_end = extension_quote(1_000_000, 1, NaiveDate::from_ymd_opt(2025, 8, 31));
        assert_eq!(from_month_end.new_end_date, NaiveDate::from_ymd_opt(2025, 10, 1));

        assert_eq!(extension_quote(1_000_000, 2, None).new_end_date, None);
    }

    #[test_case(0, "Rp 0")]
    #[test_case(999, "Rp 999")]
    #[test_case(1_000, "Rp 1.000")]
    #[test_case(2_700_000, "Rp 2.700.000")]
    #[test_case(14_400_000, "Rp 14.400.000")]
    fn test_format_idr(amount: u64, expected: &str) {
        assert_eq!(format_idr(amount), expected);
    }
}

use rust_decimal::Decimal;
use shared::models::earnings::Earnings;

/// Payout trigger: pending credits at or above the provider-configured
/// threshold yield the amount to request, otherwise nothing. Accrual and
/// settlement both happen outside this process; the monitor only compares.
pub fn check_threshold(earnings: &Earnings, threshold: Decimal) -> Option<Decimal> {
    if earnings.pending_payout >= threshold {
        Some(earnings.pending_payout)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn earnings_with_pending(pending: Decimal) -> Earnings {
        Earnings {
            total_credits: pending,
            pending_payout: pending,
            last_payout: 1_700_000_000,
            total_inference_count: 42,
        }
    }

    #[test]
    fn test_below_threshold() {
        let earnings = earnings_with_pending(dec!(99.99));
        assert_eq!(check_threshold(&earnings, dec!(100.00)), None);
    }

    #[test]
    fn test_at_threshold() {
        let earnings = earnings_with_pending(dec!(100.00));
        assert_eq!(check_threshold(&earnings, dec!(100.00)), Some(dec!(100.00)));
    }

    #[test]
    fn test_above_threshold_requests_full_pending() {
        let earnings = earnings_with_pending(dec!(250.50));
        assert_eq!(check_threshold(&earnings, dec!(100.00)), Some(dec!(250.50)));
    }

    #[test]
    fn test_zero_ledger_never_triggers() {
        let earnings = Earnings::empty(1_700_000_000);
        assert_eq!(check_threshold(&earnings, dec!(100.00)), None);
    }
}

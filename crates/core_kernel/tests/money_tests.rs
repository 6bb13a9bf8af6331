//! Unit tests for the Money module
//!
//! Tests cover money creation, checked arithmetic, parsing of member
//! input, currency handling, and display formatting.

use core_kernel::{format_amount, Currency, Money, MoneyError};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::KES);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::UGX);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
        assert_eq!(m.currency(), Currency::UGX);
    }

    #[test]
    fn test_default_currency_is_kes() {
        assert_eq!(Currency::default(), Currency::KES);
    }

    #[test]
    fn test_round_to_currency() {
        let kes = Money::new(dec!(10.555), Currency::KES).round_to_currency();
        let ugx = Money::new(dec!(10.5), Currency::UGX).round_to_currency();
        assert_eq!(kes.amount(), dec!(10.56));
        assert_eq!(ugx.amount(), dec!(10));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_and_sub() {
        let a = Money::new(dec!(4000), Currency::KES);
        let b = Money::new(dec!(1500), Currency::KES);

        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(5500));
        assert_eq!(a.checked_sub(&b).unwrap().amount(), dec!(2500));
    }

    #[test]
    fn test_checked_sub_can_go_negative() {
        let a = Money::new(dec!(500), Currency::KES);
        let b = Money::new(dec!(1500), Currency::KES);

        let result = a.checked_sub(&b).unwrap();
        assert!(result.is_negative());
        assert_eq!((-result).amount(), dec!(1000));
    }

    #[test]
    fn test_mismatched_currency_is_rejected() {
        let a = Money::new(dec!(1), Currency::KES);
        let b = Money::new(dec!(1), Currency::TZS);

        assert_eq!(
            a.checked_sub(&b),
            Err(MoneyError::CurrencyMismatch("KES".to_string(), "TZS".to_string()))
        );
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_positive_accepts_decimals() {
        let m = Money::parse_positive("1500.5", Currency::KES).unwrap();
        assert_eq!(m.amount(), dec!(1500.5));
    }

    #[test]
    fn test_parse_positive_rejects_non_numeric() {
        assert!(matches!(
            Money::parse_positive("12abc", Currency::KES),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_positive_rejects_amounts_that_round_to_zero() {
        assert!(matches!(
            Money::parse_positive("0.00001", Currency::KES),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert_eq!(Money::parse_positive("0.0001", Currency::KES).unwrap().amount(), dec!(0.0001));
    }

    #[test]
    fn test_checked_add_reports_overflow() {
        let max = Money::new(rust_decimal::Decimal::MAX, Currency::KES);
        assert!(matches!(max.checked_add(&max), Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("kes".parse::<Currency>().unwrap(), Currency::KES);
        assert_eq!(" RWF ".parse::<Currency>().unwrap(), Currency::RWF);
        assert!(matches!("XYZ".parse::<Currency>(), Err(MoneyError::UnknownCurrency(_))));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_display_uses_code_and_grouping() {
        assert_eq!(Money::new(dec!(1234567.5), Currency::UGX).to_string(), "UGX 1,234,567.5");
        assert_eq!(Money::new(dec!(500), Currency::KES).to_string(), "KES 500");
    }

    #[test]
    fn test_format_amount_trims_trailing_zeros() {
        assert_eq!(format_amount(dec!(2500.00)), "2,500");
        assert_eq!(format_amount(dec!(0.50)), "0.5");
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Currency::KES.symbol(), "KSh");
        assert_eq!(Currency::USD.symbol(), "$");
    }
}

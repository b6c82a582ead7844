use proptest::prelude::*;

use mintcap_types::{Address, TokenAmount, TypesError};

proptest! {
    /// Address text form parses back to the same bytes.
    #[test]
    fn address_text_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::from_bytes(bytes);
        let parsed = Address::parse(&addr.to_string()).unwrap();
        prop_assert_eq!(parsed.as_bytes(), &bytes);
    }

    /// Address::is_zero is true only for all-zero bytes.
    #[test]
    fn address_is_zero_correct(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::from_bytes(bytes);
        prop_assert_eq!(addr.is_zero(), bytes == [0u8; 20]);
    }

    /// Formatting in token notation and parsing back yields the same base units.
    #[test]
    fn format_then_parse_units_is_identity(raw in any::<u128>(), decimals in 0u8..=38) {
        let amount = TokenAmount::new(raw);
        let text = amount.format_units(decimals);
        prop_assert_eq!(TokenAmount::parse_units(&text, decimals).unwrap(), amount);
    }

    /// checked_add agrees with u128::checked_add.
    #[test]
    fn checked_add_matches_u128(a in any::<u128>(), b in any::<u128>()) {
        let sum = TokenAmount::new(a).checked_add(TokenAmount::new(b));
        prop_assert_eq!(sum.map(|s| s.raw()), a.checked_add(b));
    }

    /// Any leading minus sign is rejected as a negative amount, never parsed.
    #[test]
    fn negative_inputs_always_rejected(raw in any::<u128>(), decimals in 0u8..=18) {
        let text = format!("-{raw}");
        prop_assert!(
            matches!(TokenAmount::parse_raw(&text), Err(TypesError::NegativeAmount(_))),
            "parse_raw accepted {}",
            text
        );
        prop_assert!(
            matches!(TokenAmount::parse_units(&text, decimals), Err(TypesError::NegativeAmount(_))),
            "parse_units accepted {}",
            text
        );
    }
}

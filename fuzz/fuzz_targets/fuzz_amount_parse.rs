#![no_main]

use libfuzzer_sys::fuzz_target;

use mintcap_types::{Address, TokenAmount};

// Parsing user-supplied amounts and addresses must never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let decimals = data.first().copied().unwrap_or(18) % 40;

    if let Ok(amount) = TokenAmount::parse_units(text, decimals) {
        assert_eq!(
            TokenAmount::parse_units(&amount.format_units(decimals), decimals).unwrap(),
            amount
        );
    }
    let _ = TokenAmount::parse_raw(text);
    let _ = Address::parse(text);
});

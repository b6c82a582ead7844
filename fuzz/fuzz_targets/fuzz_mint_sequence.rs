#![no_main]

use libfuzzer_sys::fuzz_target;

use mintcap_ledger::{CappedLedger, GenesisConfig};
use mintcap_types::{Address, TokenAmount};

// Replay arbitrary mint attempts and check both supply invariants after each.
// Each 18-byte record is: caller selector, receiver selector, 16-byte amount.
fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }

    let max_supply = u128::from_le_bytes(data[..16].try_into().unwrap());
    let owner = Address::from_bytes([0x01; 20]);
    let mut config = GenesisConfig::standard(owner);
    config.max_supply = TokenAmount::new(max_supply);
    config.initial_supply = TokenAmount::new(max_supply / 10);
    let ledger = CappedLedger::new(config).unwrap();

    for record in data[16..].chunks_exact(18) {
        let caller = if record[0] & 1 == 0 {
            owner
        } else {
            Address::from_bytes([record[0]; 20])
        };
        let to = Address::from_bytes([record[1]; 20]);
        let amount = u128::from_le_bytes(record[2..18].try_into().unwrap());

        let before = ledger.total_supply();
        let result = ledger.mint(&caller, &to, TokenAmount::new(amount));
        if result.is_err() {
            assert_eq!(ledger.total_supply(), before);
        }
        ledger.check_invariants().unwrap();
    }
});

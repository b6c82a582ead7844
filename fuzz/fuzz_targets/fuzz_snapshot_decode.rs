#![no_main]

use libfuzzer_sys::fuzz_target;

use mintcap_ledger::{EventBus, LedgerSnapshot};

// A state file is untrusted input: decoding and restoring must never panic,
// and anything that restores must satisfy the supply invariants.
fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = serde_json::from_slice::<LedgerSnapshot>(data) else {
        return;
    };
    if let Ok(ledger) = snapshot.restore(EventBus::new()) {
        ledger.check_invariants().unwrap();
    }
});

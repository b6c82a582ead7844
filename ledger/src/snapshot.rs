//! Ledger snapshots: capture and restore the full ledger state.
//!
//! A snapshot carries a Blake2b-256 hash over the bincode encoding of its
//! contents so a tampered or truncated state file is detected on restore.
//! Restoring also re-checks both supply invariants.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use mintcap_types::{Address, TokenAmount, TokenMetadata};

use crate::error::{LedgerError, LedgerResult};
use crate::event::EventBus;
use crate::ledger::CappedLedger;
use crate::state::LedgerState;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A point-in-time copy of a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Snapshot version for compatibility.
    pub version: u32,
    pub owner: Address,
    pub max_supply: TokenAmount,
    pub metadata: TokenMetadata,
    pub total_supply: TokenAmount,
    /// Balances sorted by address.
    pub balances: Vec<(Address, TokenAmount)>,
    /// Blake2b-256 of the fields above.
    pub hash: [u8; 32],
}

/// The hashed portion of a snapshot, borrowed so hashing never clones.
#[derive(Serialize)]
struct SnapshotBody<'a> {
    version: u32,
    owner: &'a Address,
    max_supply: &'a TokenAmount,
    metadata: &'a TokenMetadata,
    total_supply: &'a TokenAmount,
    balances: &'a [(Address, TokenAmount)],
}

impl LedgerSnapshot {
    /// Capture the state of `ledger` under a single read lock.
    pub fn capture(ledger: &CappedLedger) -> LedgerResult<Self> {
        let (total_supply, mut balances) = ledger.with_state(|state| {
            let balances: Vec<(Address, TokenAmount)> =
                state.iter().map(|(addr, amount)| (*addr, *amount)).collect();
            (state.total_supply(), balances)
        });
        balances.sort_by(|a, b| a.0.cmp(&b.0));

        let mut snap = Self {
            version: SNAPSHOT_VERSION,
            owner: ledger.owner(),
            max_supply: ledger.max_supply(),
            metadata: ledger.metadata().clone(),
            total_supply,
            balances,
            hash: [0u8; 32],
        };
        snap.hash = snap.compute_hash()?;
        Ok(snap)
    }

    /// Compute the Blake2b-256 hash of this snapshot deterministically.
    pub fn compute_hash(&self) -> LedgerResult<[u8; 32]> {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let body = SnapshotBody {
            version: self.version,
            owner: &self.owner,
            max_supply: &self.max_supply,
            metadata: &self.metadata,
            total_supply: &self.total_supply,
            balances: &self.balances,
        };
        let bytes =
            bincode::serialize(&body).map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(&bytes);
        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        Ok(out)
    }

    /// Check version, hash, and owner without building a ledger.
    pub fn verify(&self) -> LedgerResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(LedgerError::Snapshot(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                self.version
            )));
        }
        if self.compute_hash()? != self.hash {
            return Err(LedgerError::Snapshot("snapshot hash mismatch".into()));
        }
        if self.owner.is_zero() {
            return Err(LedgerError::Snapshot("owner is the zero address".into()));
        }
        Ok(())
    }

    /// Rebuild a ledger from this snapshot, verifying integrity and both
    /// supply invariants.
    pub fn restore(self, events: EventBus) -> LedgerResult<CappedLedger> {
        self.verify()?;

        let mut balances = HashMap::with_capacity(self.balances.len());
        for (addr, amount) in &self.balances {
            if addr.is_zero() {
                return Err(LedgerError::Snapshot(
                    "balance entry for the zero address".into(),
                ));
            }
            if balances.insert(*addr, *amount).is_some() {
                return Err(LedgerError::Snapshot(format!("duplicate holder {addr}")));
            }
        }
        let state = LedgerState::from_parts(balances, self.total_supply);
        state
            .check_invariants(self.max_supply)
            .map_err(|e| LedgerError::Snapshot(e.to_string()))?;

        tracing::debug!(
            owner = %self.owner,
            holders = state.holder_count(),
            total_supply = %self.total_supply,
            "ledger restored from snapshot"
        );
        Ok(CappedLedger::from_parts(
            self.owner,
            self.max_supply,
            self.metadata,
            state,
            events,
        ))
    }

    /// Write the snapshot as pretty JSON, replacing `path` atomically.
    ///
    /// Each call writes its own temporary file next to `path`, so concurrent
    /// writers never clobber each other's partial output.
    pub fn save_json(&self, path: &Path) -> LedgerResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |e: std::io::Error| {
            LedgerError::Snapshot(format!("write {}: {e}", path.display()))
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| {
            LedgerError::Snapshot(format!("rename to {}: {}", path.display(), e.error))
        })?;
        Ok(())
    }

    /// Read a snapshot from a JSON file. Integrity is checked on restore.
    pub fn load_json(path: &Path) -> LedgerResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Snapshot(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&content).map_err(|e| LedgerError::Snapshot(e.to_string()))
    }
}

impl CappedLedger {
    /// Capture a snapshot of the current state.
    pub fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        LedgerSnapshot::capture(self)
    }
}

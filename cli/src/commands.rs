//! Command implementations over a JSON state file.
//!
//! Each command loads the snapshot, acts on the restored ledger, and (for
//! `init` and `mint`) writes the new snapshot back. Writers hold an exclusive
//! lock on `<state>.lock` for the whole cycle; readers rely on the state file
//! only ever being replaced atomically. Commands return the text to print so
//! they can be tested without capturing stdout.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use anyhow::{bail, Context as _};
use fs2::FileExt;
use mintcap_ledger::{CappedLedger, EventBus, GenesisConfig, LedgerSnapshot};
use mintcap_types::{Address, TokenAmount};

/// Resolved settings shared by every command.
pub struct Context {
    pub state_path: PathBuf,
    pub genesis: Option<GenesisConfig>,
}

impl Context {
    fn lock_path(&self) -> PathBuf {
        let mut name = self.state_path.clone().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Block until this process holds the writer lock. Released on drop.
    fn lock_exclusive(&self) -> anyhow::Result<File> {
        let path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .with_context(|| format!("cannot open lock file {}", path.display()))?;
        FileExt::lock_exclusive(&file)
            .with_context(|| format!("cannot lock {}", path.display()))?;
        Ok(file)
    }

    fn load(&self) -> anyhow::Result<CappedLedger> {
        let snapshot = LedgerSnapshot::load_json(&self.state_path).with_context(|| {
            format!(
                "no usable ledger state at {} (run `mintcap init` first)",
                self.state_path.display()
            )
        })?;
        Ok(snapshot.restore(EventBus::new())?)
    }

    fn save(&self, ledger: &CappedLedger) -> anyhow::Result<()> {
        ledger.snapshot()?.save_json(&self.state_path)?;
        tracing::debug!(path = %self.state_path.display(), "state saved");
        Ok(())
    }
}

fn render(ledger: &CappedLedger, amount: TokenAmount, raw: bool) -> String {
    if raw {
        amount.to_string()
    } else {
        let meta = ledger.metadata();
        format!("{} {}", amount.format_units(meta.decimals), meta.symbol)
    }
}

/// Create the ledger and write its genesis snapshot.
pub fn init(ctx: &Context, owner: Option<Address>, force: bool) -> anyhow::Result<String> {
    let _lock = ctx.lock_exclusive()?;
    if ctx.state_path.exists() && !force {
        bail!(
            "state file {} already exists (use --force to overwrite)",
            ctx.state_path.display()
        );
    }
    let genesis = match (ctx.genesis.clone(), owner) {
        (Some(mut genesis), Some(owner)) => {
            genesis.owner = owner;
            genesis
        }
        (Some(genesis), None) => genesis,
        (None, Some(owner)) => GenesisConfig::standard(owner),
        (None, None) => bail!("no owner given: pass --owner or set [genesis] owner in the config"),
    };

    let ledger = CappedLedger::new(genesis)?;
    ctx.save(&ledger)?;
    tracing::info!(path = %ctx.state_path.display(), "ledger initialised");
    Ok(format!(
        "initialised {} ({}) owned by {} with total supply {}",
        ledger.metadata().name,
        ledger.metadata().symbol,
        ledger.owner(),
        render(&ledger, ledger.total_supply(), false),
    ))
}

pub fn info(ctx: &Context) -> anyhow::Result<String> {
    let ledger = ctx.load()?;
    let meta = ledger.metadata();
    Ok([
        format!("name:         {}", meta.name),
        format!("symbol:       {}", meta.symbol),
        format!("decimals:     {}", meta.decimals),
        format!("owner:        {}", ledger.owner()),
        format!("max supply:   {}", render(&ledger, ledger.max_supply(), false)),
        format!("total supply: {}", render(&ledger, ledger.total_supply(), false)),
        format!("mintable:     {}", render(&ledger, ledger.remaining_mintable(), false)),
        format!("holders:      {}", ledger.holder_count()),
    ]
    .join("\n"))
}

pub fn total_supply(ctx: &Context, raw: bool) -> anyhow::Result<String> {
    let ledger = ctx.load()?;
    Ok(render(&ledger, ledger.total_supply(), raw))
}

pub fn balance_of(ctx: &Context, holder: &Address, raw: bool) -> anyhow::Result<String> {
    let ledger = ctx.load()?;
    Ok(render(&ledger, ledger.balance_of(holder), raw))
}

/// Mint `amount` (token notation unless `raw`) to `to` as `caller`.
pub fn mint(
    ctx: &Context,
    caller: &Address,
    to: &Address,
    amount: &str,
    raw: bool,
) -> anyhow::Result<String> {
    let _lock = ctx.lock_exclusive()?;
    let ledger = ctx.load()?;
    let amount = if raw {
        TokenAmount::parse_raw(amount)?
    } else {
        TokenAmount::parse_units(amount, ledger.metadata().decimals)?
    };
    ledger.mint(caller, to, amount)?;
    ctx.save(&ledger)?;
    Ok(format!(
        "minted {} to {}; total supply {}",
        render(&ledger, amount, false),
        to,
        render(&ledger, ledger.total_supply(), false),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintcap_ledger::LedgerError;
    use mintcap_types::TypesError;

    fn owner() -> Address {
        Address::from_bytes([0x0a; 20])
    }

    fn other() -> Address {
        Address::from_bytes([0x0b; 20])
    }

    fn context(dir: &tempfile::TempDir) -> Context {
        Context {
            state_path: dir.path().join("state.json"),
            genesis: None,
        }
    }

    #[test]
    fn init_then_read_initial_supply() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        init(&ctx, Some(owner()), false).unwrap();

        assert_eq!(total_supply(&ctx, false).unwrap(), "100 TKN");
        assert_eq!(total_supply(&ctx, true).unwrap(), "100000000000000000000");
        assert_eq!(balance_of(&ctx, &owner(), false).unwrap(), "100 TKN");
        assert_eq!(balance_of(&ctx, &other(), true).unwrap(), "0");
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        init(&ctx, Some(owner()), false).unwrap();
        mint(&ctx, &owner(), &other(), "5", false).unwrap();

        assert!(init(&ctx, Some(owner()), false).is_err());
        assert_eq!(balance_of(&ctx, &other(), false).unwrap(), "5 TKN");

        init(&ctx, Some(owner()), true).unwrap();
        assert_eq!(balance_of(&ctx, &other(), false).unwrap(), "0 TKN");
    }

    #[test]
    fn init_requires_an_owner() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init(&context(&dir), None, false).is_err());
    }

    #[test]
    fn init_uses_configured_genesis_with_owner_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut genesis = GenesisConfig::standard(other());
        genesis.metadata.symbol = "CAP".into();
        let ctx = Context {
            state_path: dir.path().join("state.json"),
            genesis: Some(genesis),
        };
        init(&ctx, Some(owner()), false).unwrap();
        assert_eq!(balance_of(&ctx, &owner(), false).unwrap(), "100 CAP");
        assert!(info(&ctx).unwrap().contains(&owner().to_string()));
    }

    #[test]
    fn mint_persists_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        init(&ctx, Some(owner()), false).unwrap();

        mint(&ctx, &owner(), &other(), "50", false).unwrap();
        mint(&ctx, &owner(), &other(), "0.5", false).unwrap();
        mint(&ctx, &owner(), &owner(), "1", true).unwrap();

        assert_eq!(balance_of(&ctx, &other(), false).unwrap(), "50.5 TKN");
        assert_eq!(total_supply(&ctx, true).unwrap(), "150500000000000000001");
    }

    #[test]
    fn mint_up_to_cap_and_beyond() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        init(&ctx, Some(owner()), false).unwrap();

        let err = mint(&ctx, &owner(), &owner(), "901", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::SupplyCapExceeded { .. })
        ));
        assert_eq!(total_supply(&ctx, false).unwrap(), "100 TKN");

        mint(&ctx, &owner(), &other(), "900", false).unwrap();
        assert_eq!(total_supply(&ctx, false).unwrap(), "1000 TKN");
    }

    #[test]
    fn mint_by_non_owner_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        init(&ctx, Some(owner()), false).unwrap();

        let err = mint(&ctx, &other(), &other(), "50", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::Unauthorized { .. })
        ));
        assert_eq!(balance_of(&ctx, &other(), false).unwrap(), "0 TKN");
    }

    #[test]
    fn negative_amount_is_rejected_before_minting() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        init(&ctx, Some(owner()), false).unwrap();

        let err = mint(&ctx, &owner(), &other(), "-5", false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TypesError>(),
            Some(TypesError::NegativeAmount(_))
        ));
        assert_eq!(total_supply(&ctx, false).unwrap(), "100 TKN");
    }

    #[test]
    fn overlapping_mints_are_all_persisted() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        init(&ctx, Some(owner()), false).unwrap();

        let successes = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..20 {
                        if mint(&ctx, &owner(), &other(), "1", true).is_ok() {
                            successes.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        let successes = successes.load(Ordering::SeqCst);
        assert_eq!(successes, 160);
        assert_eq!(balance_of(&ctx, &other(), true).unwrap(), successes.to_string());
        assert_eq!(total_supply(&ctx, true).unwrap(), "100000000000000000160");
    }

    #[test]
    fn commands_without_state_fail() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        assert!(total_supply(&ctx, false).is_err());
        assert!(info(&ctx).is_err());
    }
}

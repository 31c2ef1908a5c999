//! Command parsing and dispatch.

use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::Serialize;

use quoracle_core::PriceOracle;
use quoracle_db::SqlitePriceStore;
use quoracle_types::{Address, PriceWithProof};

pub const USAGE: &str = "usage: quoracle [--config <file>] <command>
  assets
  inspect <base> <quote>
  price <base> <quote>
  in-bound <base> <quote> <price>
  quote <base> <quote> <amount>
  update <base> <quote> <file.json>
  initialize <caller>
  transfer-ownership <caller> <new-owner>";

/// A parsed command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Assets,
    Inspect { base: Address, quote: Address },
    Price { base: Address, quote: Address },
    InBound { base: Address, quote: Address, price: u128 },
    Quote { base: Address, quote: Address, amount: u128 },
    Update { base: Address, quote: Address, file: PathBuf },
    Initialize { caller: Address },
    TransferOwnership { caller: Address, new_owner: Address },
}

impl Command {
    /// Parse the arguments following the program name and global flags.
    pub fn parse(args: &[String]) -> anyhow::Result<Option<Self>> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(None);
        };
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

        let command = match (name.as_str(), rest.as_slice()) {
            ("assets", []) => Command::Assets,
            ("inspect", [base, quote]) => Command::Inspect {
                base: address(base)?,
                quote: address(quote)?,
            },
            ("price", [base, quote]) => Command::Price {
                base: address(base)?,
                quote: address(quote)?,
            },
            ("in-bound", [base, quote, price]) => Command::InBound {
                base: address(base)?,
                quote: address(quote)?,
                price: price.parse().with_context(|| format!("price {price}"))?,
            },
            ("quote", [base, quote, amount]) => Command::Quote {
                base: address(base)?,
                quote: address(quote)?,
                amount: amount.parse().with_context(|| format!("amount {amount}"))?,
            },
            ("update", [base, quote, file]) => Command::Update {
                base: address(base)?,
                quote: address(quote)?,
                file: PathBuf::from(file),
            },
            ("initialize", [caller]) => Command::Initialize {
                caller: address(caller)?,
            },
            ("transfer-ownership", [caller, new_owner]) => Command::TransferOwnership {
                caller: address(caller)?,
                new_owner: address(new_owner)?,
            },
            _ => bail!("unrecognized command: {}\n{USAGE}", args.join(" ")),
        };
        Ok(Some(command))
    }
}

fn address(s: &str) -> anyhow::Result<Address> {
    Ok(s.parse()?)
}

/// Raw cache state for one direction, as printed by `inspect`.
#[derive(Debug, Serialize)]
struct InspectReport {
    base: Address,
    quote: Address,
    exists: bool,
    price: u128,
    expiration: u64,
    now: u64,
    valid: bool,
    expiration_offset_sec: u64,
}

/// Execute `command` against `oracle` at `now_ms`.
pub fn run(
    oracle: &mut PriceOracle<SqlitePriceStore>,
    command: Command,
    now_ms: u64,
) -> anyhow::Result<()> {
    match command {
        Command::Assets => {
            let assets: Vec<_> = oracle.registry().iter().cloned().collect();
            print_json(&assets)?;
        }
        Command::Inspect { base, quote } => {
            let entry = oracle.prices_cache(base, quote)?;
            print_json(&InspectReport {
                base,
                quote,
                exists: entry.exists,
                price: entry.price,
                expiration: entry.expiration,
                now: now_ms,
                valid: entry.exists && !entry.is_expired(now_ms),
                expiration_offset_sec: oracle.expiration_offset_sec(),
            })?;
        }
        Command::Price { base, quote } => {
            print_json(&oracle.get_price(base, quote, now_ms)?)?;
        }
        Command::InBound { base, quote, price } => {
            print_json(&oracle.price_in_bound(base, quote, price, now_ms)?)?;
        }
        Command::Quote {
            base,
            quote,
            amount,
        } => {
            print_json(&oracle.quote_amount(base, quote, amount, now_ms)?)?;
        }
        Command::Update { base, quote, file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let update: PriceWithProof = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", file.display()))?;
            oracle.update_price(base, quote, &update, now_ms)?;
        }
        Command::Initialize { caller } => {
            oracle.initialize(caller)?;
            oracle.store().save_access(oracle.access())?;
        }
        Command::TransferOwnership { caller, new_owner } => {
            oracle.transfer_ownership(caller, new_owner)?;
            oracle.store().save_access(oracle.access())?;
        }
    }

    for event in oracle.drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! quoracle: operator and inspection tool for a persisted price oracle.
//!
//! Usage:
//!   quoracle [--config <file>] <command> [args...]
//!
//! Commands:
//!   assets                                 List registered assets
//!   inspect <base> <quote>                 Raw cache entry and validity
//!   price <base> <quote>                   Current price (direct or inverse)
//!   in-bound <base> <quote> <price>        Check a price against the band
//!   quote <base> <quote> <amount>          Convert atomic amounts
//!   update <base> <quote> <file.json>      Submit a price with proof
//!   initialize <caller>                    Set the initialization latch
//!   transfer-ownership <caller> <owner>    Hand over ownership
//!
//! The data directory is `$QUORACLE_DATA_DIR` or the platform default.

mod commands;

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::info;

use quoracle_core::config::OracleConfig;
use quoracle_db::SqlitePriceStore;

use crate::commands::Command;

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let config = match take_flag(&mut args, "--config")? {
        Some(path) => OracleConfig::from_path(&PathBuf::from(path))?,
        None => OracleConfig::load()?,
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("quoracle={}", config.logging.log_level).parse()?),
        )
        .init();

    let Some(command) = Command::parse(&args)? else {
        eprintln!("{}", commands::USAGE);
        bail!("no command given");
    };

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let db_path = data_dir.join(quoracle_db::DB_FILE);
    info!(db = %db_path.display(), "opening oracle database");
    let conn = quoracle_db::open(&db_path)?;
    let mut oracle = SqlitePriceStore::new(conn).into_oracle(&config)?;

    commands::run(&mut oracle, command, now_ms()?)
}

/// Remove `--flag <value>` from `args`.
fn take_flag(args: &mut Vec<String>, flag: &str) -> anyhow::Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        bail!("{flag} needs a value");
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

/// Wall-clock time in Unix milliseconds. The only clock read in the system.
fn now_ms() -> anyhow::Result<u64> {
    let elapsed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .context("system clock before Unix epoch")?;
    Ok(u64::try_from(elapsed.as_millis())?)
}

// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Issuer Admin
//!
//! Entry point for the `issuer-admin` binary. Parses CLI arguments,
//! initializes logging, and runs one command against the local store.
//!
//! - `issuers`      - list the issuers registered for an account
//! - `template`     - show or set the issuer template
//! - `classify`     - classify a raw transaction result offline
//! - `check-amount` - run the transfer amount validation
//! - `version`      - print build version information

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use issuer_protocol::config;
use issuer_protocol::issuer::IssuerRecord;
use issuer_protocol::storage::{IssuerDb, IssuerRegistry, SettingsStore};
use issuer_protocol::transaction::{classifier, RawTransactionResult};
use issuer_protocol::workflow::validation;

use cli::{Commands, IssuerAdminCli, TemplateCommand};

fn main() -> Result<()> {
    let cli = IssuerAdminCli::parse();
    logging::init_logging(logging::DEFAULT_FILTER, cli.log_format);

    match cli.command {
        Commands::Issuers(args) => {
            let Some(account) = args.account else {
                for account in list_accounts(&cli.data_dir)? {
                    println!("{}", account);
                }
                return Ok(());
            };
            let issuers = list_issuers(&cli.data_dir, &account)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&issuers)?);
            } else {
                print_issuers(&account, &issuers);
            }
            Ok(())
        }
        Commands::Template(TemplateCommand::Show) => {
            match show_template(&cli.data_dir)? {
                Some(template) => println!("{}", template),
                None => println!("no template configured"),
            }
            Ok(())
        }
        Commands::Template(TemplateCommand::Set { template }) => {
            if set_template(&cli.data_dir, &template)? {
                println!("template set to {}", template.trim());
            } else {
                println!("template unchanged");
            }
            Ok(())
        }
        Commands::Classify(args) => {
            let raw = read_result(&args.file)?;
            println!("{}", classify_result(raw, args.template.as_deref())?);
            Ok(())
        }
        Commands::CheckAmount(args) => {
            check_amount(&args.amount)?;
            println!("{} is a valid amount", args.amount);
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Opens the issuer database under `data_dir`, creating it on first use.
fn open_db(data_dir: &Path) -> Result<IssuerDb> {
    let db_path = data_dir.join(config::DB_DIR_NAME);
    std::fs::create_dir_all(&db_path)
        .with_context(|| format!("failed to create database directory: {}", db_path.display()))?;

    let db = IssuerDb::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    tracing::debug!(path = %db_path.display(), "database opened");
    Ok(db)
}

fn list_issuers(data_dir: &Path, account: &str) -> Result<Vec<IssuerRecord>> {
    let registry = IssuerRegistry::open(open_db(data_dir)?)?;
    Ok(registry.get_issuers(Some(account))?)
}

fn list_accounts(data_dir: &Path) -> Result<Vec<String>> {
    let registry = IssuerRegistry::open(open_db(data_dir)?)?;
    Ok(registry.accounts()?)
}

fn print_issuers(account: &str, issuers: &[IssuerRecord]) {
    if issuers.is_empty() {
        println!("No issuers registered for {}.", account);
        return;
    }

    println!("Issuers for {}:", account);
    for issuer in issuers {
        println!("  {}", issuer.id);
        println!("    Vault         : {}", issuer.vault.id);
        println!("    Balance       : {}", issuer.total_balance());
        match &issuer.wrapped_token {
            Some(token) => println!(
                "    Wrapped token : {} (fee {})",
                token.resource, token.exchange_fee
            ),
            None => println!("    Wrapped token : none"),
        }
    }
}

fn show_template(data_dir: &Path) -> Result<Option<String>> {
    Ok(SettingsStore::new(open_db(data_dir)?).template()?)
}

fn set_template(data_dir: &Path, template: &str) -> Result<bool> {
    Ok(SettingsStore::new(open_db(data_dir)?).set_template(template)?)
}

fn read_result(path: &Path) -> Result<RawTransactionResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a transaction result", path.display()))
}

/// Classifies `raw` and renders the answer for the terminal.
///
/// With a template, ledger rejections are errors and success yields the
/// created component. Without one, any recognized outcome is printed.
fn classify_result(raw: RawTransactionResult, template: Option<&str>) -> Result<String> {
    match template {
        Some(template) => {
            let component = classifier::classify(raw, template)?;
            Ok(format!("created component {}", component))
        }
        None => Ok(classifier::outcome(raw)?.to_string()),
    }
}

fn check_amount(amount: &str) -> Result<()> {
    validation::validate_amount(config::TRANSFER_AMOUNT_FIELD, amount)?;
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("issuer-admin {}", env!("CARGO_PKG_VERSION"));
    println!("rustc        {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

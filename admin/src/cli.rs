//! # CLI Interface
//!
//! Command-line structure for `issuer-admin`, using `clap` derive. The
//! global flags pick the data directory and log format; each subcommand
//! is one offline operation on the local store.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use issuer_protocol::config;

use crate::logging::LogFormat;

/// Operator tool for the local issuer store.
///
/// Inspects the issuers registered per account, manages the configured
/// issuer template, and classifies raw transaction results offline.
#[derive(Parser, Debug)]
#[command(
    name = "issuer-admin",
    about = "Operator tool for the local issuer store",
    version,
    propagate_version = true
)]
pub struct IssuerAdminCli {
    /// Directory holding the issuer database.
    #[arg(
        long,
        short = 'd',
        global = true,
        env = "ISSUER_ADMIN_DATA_DIR",
        default_value = config::DEFAULT_DATA_DIR
    )]
    pub data_dir: PathBuf,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the issuers registered for an account, or the accounts with
    /// issuers when no account is given.
    Issuers(IssuersArgs),
    /// Show or change the issuer template.
    #[command(subcommand)]
    Template(TemplateCommand),
    /// Classify a raw transaction result read from a JSON file.
    Classify(ClassifyArgs),
    /// Check whether a transfer amount would pass validation.
    CheckAmount(CheckAmountArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct IssuersArgs {
    /// Public key of the account.
    #[arg(long, short = 'a')]
    pub account: Option<String>,

    /// Print the records as JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// Print the configured template address.
    Show,
    /// Persist a new template address.
    Set {
        /// Template address of the issuer component.
        template: String,
    },
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Path to the raw result JSON.
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// Extract the component created from this template.
    ///
    /// Without it, only the outcome is reported.
    #[arg(long, short = 't')]
    pub template: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckAmountArgs {
    /// Amount exactly as it would be entered in the transfer form.
    pub amount: String,
}

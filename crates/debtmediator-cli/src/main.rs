mod commands;
mod error;
mod mailer;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{backup, borrowers, check_user, completions, import, send_form, Context};
use crate::error::{exit_code_for, report_error, report_usage_error};
use debtmediator_config as config;
use debtmediator_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "debtmediator", version, about = "Borrower lookup and settlement request intake")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check whether an IIN and phone number belong to a known borrower
    #[command(name = "check-user")]
    CheckUser(check_user::CheckUserArgs),
    /// Email a settlement request with attachments
    #[command(name = "send-form")]
    SendForm(send_form::SendFormArgs),
    #[command(subcommand)]
    Borrower(borrowers::BorrowerCommand),
    #[command(subcommand)]
    Import(import::ImportCommand),
    Backup(backup::BackupArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_usage_error(&err),
    };
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose: _,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    match config::resolve_config_path(config_path) {
        Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
        Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
        Err(err) => debug!(error = %err, "config unavailable"),
    }

    let command = match command {
        Command::SendForm(args) => return send_form::send_form(&app_config, json, args),
        command => command,
    };

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::CheckUser(args) => check_user::check_user(&ctx, args),
        Command::Borrower(cmd) => match cmd {
            borrowers::BorrowerCommand::Add(args) => borrowers::add_borrower(&ctx, args),
            borrowers::BorrowerCommand::Ls(args) => borrowers::list_borrowers(&ctx, args),
            borrowers::BorrowerCommand::Rm(args) => borrowers::remove_borrower(&ctx, args),
        },
        Command::Import(cmd) => match cmd {
            import::ImportCommand::Borrowers(args) => import::import_borrowers(&ctx, args),
        },
        Command::Backup(args) => backup::backup(&ctx, args),
        Command::SendForm(_) => unreachable!("send-form handled before store initialization"),
        Command::Completions(_) => {
            unreachable!("completions command handled before store initialization")
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

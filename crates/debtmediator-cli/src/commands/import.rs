use crate::commands::{print_json, Context};
use crate::util::now_utc;
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use debtmediator_core::domain::StoredRecord;
use debtmediator_core::dto::ImportReportDto;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Import a JSON array of {"iin", "phoneNumber"} documents
    Borrowers(ImportBorrowersArgs),
}

#[derive(Debug, Args)]
pub struct ImportBorrowersArgs {
    pub file: PathBuf,
}

pub fn import_borrowers(ctx: &Context<'_>, args: ImportBorrowersArgs) -> Result<()> {
    let data = fs::read_to_string(&args.file)
        .with_context(|| format!("read borrowers file {}", args.file.display()))?;
    let records: Vec<StoredRecord> = serde_json::from_str(&data)
        .with_context(|| format!("parse borrowers file {}", args.file.display()))?;

    let imported = ctx
        .store
        .borrowers()
        .import(now_utc(), records)
        .with_context(|| "import borrowers")?;
    info!(imported, file = %args.file.display(), "borrowers imported");

    let report = ImportReportDto { imported };
    if ctx.json {
        return print_json(&report);
    }
    println!("Imported {} borrowers", report.imported);
    Ok(())
}

use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{format_timestamp_datetime, now_utc, parse_borrower_id, parse_stored_value};
use anyhow::Result;
use clap::{Args, Subcommand};
use debtmediator_core::domain::StoredRecord;
use debtmediator_core::dto::BorrowerDto;
use debtmediator_store::error::StoreError;

#[derive(Debug, Subcommand)]
pub enum BorrowerCommand {
    Add(AddBorrowerArgs),
    Ls(ListBorrowersArgs),
    Rm(RemoveBorrowerArgs),
}

#[derive(Debug, Args)]
pub struct AddBorrowerArgs {
    #[arg(long)]
    pub iin: String,
    #[arg(long)]
    pub phone: String,
    /// Store the IIN as a number instead of text
    #[arg(long)]
    pub numeric_iin: bool,
    /// Store the phone as a number instead of text
    #[arg(long)]
    pub numeric_phone: bool,
}

#[derive(Debug, Args)]
pub struct ListBorrowersArgs {
    /// Only borrowers whose IIN normalizes to this value
    #[arg(long)]
    pub iin: Option<String>,
}

#[derive(Debug, Args)]
pub struct RemoveBorrowerArgs {
    pub id: String,
}

pub fn add_borrower(ctx: &Context<'_>, args: AddBorrowerArgs) -> Result<()> {
    let record = StoredRecord {
        national_id: parse_stored_value("iin", &args.iin, args.numeric_iin)?,
        phone: parse_stored_value("phone", &args.phone, args.numeric_phone)?,
    };
    let borrower = ctx.store.borrowers().create(now_utc(), record)?;

    if ctx.json {
        return print_json(&BorrowerDto::from(borrower));
    }
    println!("Added borrower {}", borrower.id);
    Ok(())
}

pub fn list_borrowers(ctx: &Context<'_>, args: ListBorrowersArgs) -> Result<()> {
    let borrowers = match args.iin.as_deref() {
        Some(iin) => ctx.store.borrowers().find_candidates(iin)?,
        None => ctx.store.borrowers().list()?,
    };

    if ctx.json {
        let items = borrowers
            .into_iter()
            .map(BorrowerDto::from)
            .collect::<Vec<_>>();
        return print_json(&items);
    }

    if borrowers.is_empty() {
        println!("No borrowers.");
        return Ok(());
    }
    for borrower in borrowers {
        println!(
            "{}  iin={} ({})  phone={} ({})  added {}",
            borrower.id,
            borrower.record.national_id,
            borrower.record.national_id.kind(),
            borrower.record.phone,
            borrower.record.phone.kind(),
            format_timestamp_datetime(borrower.created_at)
        );
    }
    Ok(())
}

pub fn remove_borrower(ctx: &Context<'_>, args: RemoveBorrowerArgs) -> Result<()> {
    let id = parse_borrower_id(&args.id)?;
    match ctx.store.borrowers().delete(id) {
        Ok(()) => {}
        Err(StoreError::NotFound(_)) => return Err(not_found(format!("borrower {id}"))),
        Err(err) => return Err(err.into()),
    }

    if ctx.json {
        return print_json(&serde_json::json!({ "removed": id }));
    }
    println!("Removed borrower {id}");
    Ok(())
}

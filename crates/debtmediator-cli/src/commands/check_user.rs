use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use debtmediator_core::dto::CheckUserDto;
use debtmediator_core::{match_claim, IdentifierClaim};
use tracing::debug;

#[derive(Debug, Args)]
pub struct CheckUserArgs {
    /// National identification number (IIN)
    #[arg(long)]
    pub iin: String,
    #[arg(long = "phone", alias = "phone-number")]
    pub phone: String,
}

pub fn check_user(ctx: &Context<'_>, args: CheckUserArgs) -> Result<()> {
    let claim = IdentifierClaim::new(args.iin, args.phone);
    let candidates = ctx
        .store
        .borrowers()
        .find_candidates(&claim.national_id)
        .with_context(|| "look up borrowers")?;
    let result = match_claim(&claim, &candidates, ctx.config.matching)?;

    match result.matched_index.map(|index| &candidates[index]) {
        Some(borrower) => debug!(
            borrower = %borrower.id,
            candidates = candidates.len(),
            "claim matched"
        ),
        None => debug!(candidates = candidates.len(), "claim did not match"),
    }

    let dto = CheckUserDto {
        exists: result.is_match(),
    };
    if ctx.json {
        return print_json(&dto);
    }
    println!("exists: {}", dto.exists);
    Ok(())
}

use crate::commands::print_json;
use crate::error::invalid_input;
use crate::mailer::{DryRunMailer, Mailer, OutgoingMail, SmtpMailer};
use anyhow::{Context as _, Result};
use clap::Args;
use debtmediator_config::AppConfig;
use debtmediator_core::domain::{FormAttachment, SettlementRequest};
use debtmediator_core::dto::FormSentDto;
use std::path::PathBuf;

const SENT_MESSAGE: &str = "Форма отправлена успешно";

#[derive(Debug, Args)]
pub struct SendFormArgs {
    #[arg(long)]
    pub full_name: String,
    /// Registered address
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub comments: Option<String>,
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,
    /// Print the message instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn send_form(config: &AppConfig, json: bool, args: SendFormArgs) -> Result<()> {
    let attachments = args
        .files
        .into_iter()
        .map(FormAttachment::from_path)
        .collect();
    let request = SettlementRequest::new(
        &args.full_name,
        &args.address,
        args.comments.as_deref(),
        attachments,
        config.forms.max_attachments,
    )?;
    let mail = OutgoingMail::from_request(&request);

    let mailer: Box<dyn Mailer> = if args.dry_run {
        Box::new(DryRunMailer)
    } else {
        let mail_config = config
            .mail
            .as_ref()
            .ok_or_else(|| invalid_input("mail is not configured; add a [mail] section"))?;
        Box::new(SmtpMailer::new(mail_config)?)
    };
    mailer
        .send(&mail)
        .with_context(|| "send settlement request")?;

    let dto = FormSentDto {
        message: SENT_MESSAGE.to_string(),
        attachments: request.attachments.len(),
    };
    if json {
        return print_json(&dto);
    }
    println!("{}", dto.message);
    Ok(())
}

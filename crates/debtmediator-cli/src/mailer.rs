use anyhow::{Context as _, Result};
use debtmediator_config::{EmailTls, MailConfig};
use debtmediator_core::domain::{FormAttachment, SettlementRequest};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::Message;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::invalid_input;

/// A fully rendered message, ready for any delivery channel.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub subject: String,
    pub text: String,
    pub html: String,
    pub attachments: Vec<FormAttachment>,
}

impl OutgoingMail {
    pub fn from_request(request: &SettlementRequest) -> Self {
        Self {
            subject: request.subject().to_string(),
            text: request.render_text(),
            html: request.render_html(),
            attachments: request.attachments.clone(),
        }
    }
}

pub trait Mailer {
    fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Prints the message to stderr instead of delivering it.
pub struct DryRunMailer;

impl Mailer for DryRunMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let files = read_attachments(&mail.attachments)?;
        eprintln!("Subject: {}", mail.subject);
        eprintln!();
        eprintln!("{}", mail.text);
        for (attachment, bytes) in mail.attachments.iter().zip(&files) {
            eprintln!("[attachment] {} ({} bytes)", attachment.name, bytes.len());
        }
        Ok(())
    }
}

pub struct SmtpMailer {
    from: Mailbox,
    to: Vec<Mailbox>,
    transport: lettre::SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        use lettre::transport::smtp::authentication::Credentials;
        use std::env;
        use std::time::Duration;

        let from: Mailbox = config
            .from
            .parse()
            .map_err(|_| invalid_input("mail.from must be a valid email address"))?;
        let to = config
            .to
            .iter()
            .map(|raw| {
                raw.parse()
                    .map_err(|_| invalid_input("mail.to must contain valid email addresses"))
            })
            .collect::<Result<Vec<Mailbox>>>()?;

        let mut builder = match config.tls {
            EmailTls::Tls => lettre::SmtpTransport::relay(&config.smtp_host)
                .map_err(|_| invalid_input("invalid mail.smtp_host"))?,
            EmailTls::StartTls => lettre::SmtpTransport::starttls_relay(&config.smtp_host)
                .map_err(|_| invalid_input("invalid mail.smtp_host"))?,
            EmailTls::None => lettre::SmtpTransport::builder_dangerous(&config.smtp_host),
        };

        if let Some(port) = config.smtp_port {
            builder = builder.port(port);
        }
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Some(Duration::from_secs(seconds)));
        }

        if let (Some(username), Some(password_env)) =
            (config.username.as_deref(), config.password_env.as_deref())
        {
            let password = env::var(password_env)
                .map_err(|_| invalid_input(format!("missing env var {password_env}")))?;
            let password = password.trim();
            if password.is_empty() {
                return Err(invalid_input(format!("env var {password_env} is empty")));
            }
            builder = builder.credentials(Credentials::new(
                username.to_string(),
                password.to_string(),
            ));
        }

        Ok(Self {
            from,
            to,
            transport: builder.build(),
        })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<()> {
        use lettre::Transport as _;

        let message = build_message(&self.from, &self.to, mail)?;
        debug!(
            recipients = self.to.len(),
            attachments = mail.attachments.len(),
            "sending mail"
        );
        self.transport.send(&message).context("deliver mail over smtp")?;
        info!(subject = %mail.subject, "mail delivered");
        Ok(())
    }
}

fn build_message(from: &Mailbox, to: &[Mailbox], mail: &OutgoingMail) -> Result<Message> {
    let files = read_attachments(&mail.attachments)?;

    let mut body = MultiPart::mixed().multipart(MultiPart::alternative_plain_html(
        mail.text.clone(),
        mail.html.clone(),
    ));
    for (attachment, bytes) in mail.attachments.iter().zip(files) {
        body = body.singlepart(
            Attachment::new(attachment.name.clone())
                .body(bytes, content_type_for(&attachment.path)?),
        );
    }

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(mail.subject.clone());
    for mailbox in to {
        builder = builder.to(mailbox.clone());
    }
    Ok(builder.multipart(body)?)
}

fn read_attachments(attachments: &[FormAttachment]) -> Result<Vec<Vec<u8>>> {
    attachments
        .iter()
        .map(|attachment| {
            fs::read(&attachment.path)
                .with_context(|| format!("read attachment {}", attachment.path.display()))
        })
        .collect()
}

fn content_type_for(path: &Path) -> Result<ContentType> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let mime = match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    };
    ContentType::parse(mime).with_context(|| format!("content type {mime}"))
}

#[cfg(test)]
mod tests {
    use super::{build_message, OutgoingMail, SmtpMailer};
    use debtmediator_config::{EmailTls, MailConfig};
    use debtmediator_core::domain::{FormAttachment, SettlementRequest};
    use lettre::message::Mailbox;
    use std::fs;
    use tempfile::TempDir;

    fn base_config() -> MailConfig {
        MailConfig {
            from: "Intake <intake@example.com>".to_string(),
            to: vec!["Desk <desk@example.com>".to_string()],
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: Some(587),
            username: None,
            password_env: None,
            tls: EmailTls::StartTls,
            timeout_seconds: Some(5),
        }
    }

    #[test]
    fn smtp_mailer_new_fails_when_password_env_missing() {
        let mut config = base_config();
        config.username = Some("intake@example.com".to_string());
        config.password_env = Some("DEBTMEDIATOR_TEST_SMTP_PASSWORD_MISSING".to_string());
        std::env::remove_var("DEBTMEDIATOR_TEST_SMTP_PASSWORD_MISSING");
        match SmtpMailer::new(&config) {
            Ok(_) => panic!("expected error"),
            Err(err) => assert!(err.to_string().contains("missing env var")),
        }
    }

    #[test]
    fn smtp_mailer_new_supports_tls_modes() {
        let mut config = base_config();
        for tls in [EmailTls::None, EmailTls::StartTls, EmailTls::Tls] {
            config.tls = tls;
            assert!(SmtpMailer::new(&config).is_ok());
        }
    }

    #[test]
    fn build_message_attaches_files() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("statement.pdf");
        fs::write(&path, b"%PDF-1.4").expect("write attachment");

        let request = SettlementRequest::new(
            "Aigerim Sadykova",
            "Almaty",
            None,
            vec![FormAttachment::from_path(path)],
            5,
        )
        .expect("request");
        let mail = OutgoingMail::from_request(&request);
        let from: Mailbox = "intake@example.com".parse().expect("from");
        let to: Vec<Mailbox> = vec!["desk@example.com".parse().expect("to")];

        let message = build_message(&from, &to, &mail).expect("message");
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("statement.pdf"));
        assert!(raw.contains("application/pdf"));
    }

    #[test]
    fn build_message_fails_for_missing_attachment() {
        let request = SettlementRequest::new(
            "Aigerim Sadykova",
            "Almaty",
            None,
            vec![FormAttachment::from_path("/nonexistent/scan.png".into())],
            5,
        )
        .expect("request");
        let mail = OutgoingMail::from_request(&request);
        let from: Mailbox = "intake@example.com".parse().expect("from");
        let err = build_message(&from, &[], &mail).unwrap_err();
        assert!(err.to_string().contains("read attachment"));
    }
}

use crate::error::CoreError;
use std::path::PathBuf;

pub const SETTLEMENT_SUBJECT: &str = "Новая заявка на урегулирование задолженности";
pub const DEFAULT_MAX_ATTACHMENTS: usize = 5;

const LABEL_FULL_NAME: &str = "ФИО";
const LABEL_ADDRESS: &str = "Адрес регистрации";
const LABEL_COMMENTS: &str = "Комментарии";
const LABEL_ATTACHMENTS: &str = "Прикрепленные файлы";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAttachment {
    pub name: String,
    pub path: PathBuf,
}

impl FormAttachment {
    /// Uses the file name of `path` as the attachment name.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

/// A debt settlement request submitted through the intake form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementRequest {
    pub full_name: String,
    pub address: String,
    pub comments: Option<String>,
    pub attachments: Vec<FormAttachment>,
}

impl SettlementRequest {
    pub fn new(
        full_name: &str,
        address: &str,
        comments: Option<&str>,
        attachments: Vec<FormAttachment>,
        max_attachments: usize,
    ) -> Result<Self, CoreError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(CoreError::MissingFormField("full name"));
        }
        let address = address.trim();
        if address.is_empty() {
            return Err(CoreError::MissingFormField("address"));
        }
        if attachments.len() > max_attachments {
            return Err(CoreError::TooManyAttachments {
                count: attachments.len(),
                max: max_attachments,
            });
        }
        let comments = comments
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            full_name: full_name.to_string(),
            address: address.to_string(),
            comments,
            attachments,
        })
    }

    fn attachment_names(&self) -> String {
        self.attachments
            .iter()
            .map(|attachment| attachment.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn subject(&self) -> &'static str {
        SETTLEMENT_SUBJECT
    }

    pub fn render_text(&self) -> String {
        format!(
            "{LABEL_FULL_NAME}: {}\n{LABEL_ADDRESS}: {}\n{LABEL_COMMENTS}: {}\n{LABEL_ATTACHMENTS}: {}",
            self.full_name,
            self.address,
            self.comments.as_deref().unwrap_or_default(),
            self.attachment_names()
        )
    }

    pub fn render_html(&self) -> String {
        let rows = [
            (LABEL_FULL_NAME, self.full_name.clone()),
            (LABEL_ADDRESS, self.address.clone()),
            (LABEL_COMMENTS, self.comments.clone().unwrap_or_default()),
            (LABEL_ATTACHMENTS, self.attachment_names()),
        ];
        rows.iter()
            .map(|(label, value)| {
                format!("<p><strong>{label}:</strong> {}</p>", escape_html(value))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{FormAttachment, SettlementRequest, DEFAULT_MAX_ATTACHMENTS};
    use crate::error::CoreError;
    use std::path::PathBuf;

    fn attachment(name: &str) -> FormAttachment {
        FormAttachment::from_path(PathBuf::from("/tmp/uploads").join(name))
    }

    #[test]
    fn requires_full_name_and_address() {
        let err = SettlementRequest::new("  ", "Almaty", None, Vec::new(), 5).unwrap_err();
        assert_eq!(err, CoreError::MissingFormField("full name"));
        let err = SettlementRequest::new("Aigerim", "", None, Vec::new(), 5).unwrap_err();
        assert_eq!(err, CoreError::MissingFormField("address"));
    }

    #[test]
    fn rejects_too_many_attachments() {
        let files = (0..6).map(|i| attachment(&format!("doc{i}.pdf"))).collect();
        let err =
            SettlementRequest::new("Aigerim", "Almaty", None, files, DEFAULT_MAX_ATTACHMENTS)
                .unwrap_err();
        assert_eq!(err, CoreError::TooManyAttachments { count: 6, max: 5 });
    }

    #[test]
    fn attachment_name_comes_from_file_name() {
        assert_eq!(attachment("contract.pdf").name, "contract.pdf");
    }

    #[test]
    fn render_text_lists_fields_and_attachments() {
        let request = SettlementRequest::new(
            " Aigerim Sadykova ",
            "Almaty, Abay 1",
            Some("call after 6pm"),
            vec![attachment("a.pdf"), attachment("b.jpg")],
            5,
        )
        .expect("request");
        let text = request.render_text();
        assert!(text.starts_with("ФИО: Aigerim Sadykova\n"));
        assert!(text.contains("Комментарии: call after 6pm"));
        assert!(text.ends_with("Прикрепленные файлы: a.pdf, b.jpg"));
    }

    #[test]
    fn render_html_escapes_values() {
        let request = SettlementRequest::new(
            "<b>Aigerim</b>",
            "Almaty & Co",
            None,
            Vec::new(),
            5,
        )
        .expect("request");
        let html = request.render_html();
        assert!(html.contains("<p><strong>ФИО:</strong> &lt;b&gt;Aigerim&lt;/b&gt;</p>"));
        assert!(html.contains("Almaty &amp; Co"));
        assert!(html.contains("<p><strong>Комментарии:</strong> </p>"));
    }

    #[test]
    fn blank_comments_become_none() {
        let request =
            SettlementRequest::new("Aigerim", "Almaty", Some("   "), Vec::new(), 5).expect("ok");
        assert!(request.comments.is_none());
    }
}

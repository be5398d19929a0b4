use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use debtmediator_core::{MatchPolicy, DEFAULT_MAX_ATTACHMENTS};
use lettre::message::Mailbox;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "debtmediator";
const CONFIG_FILENAME: &str = "config.toml";

pub const MAX_ATTACHMENTS_LIMIT: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub matching: MatchPolicy,
    pub forms: FormsConfig,
    pub mail: Option<MailConfig>,
}

#[derive(Debug, Clone)]
pub struct FormsConfig {
    pub max_attachments: usize,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            max_attachments: DEFAULT_MAX_ATTACHMENTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from: String,
    pub to: Vec<String>,
    pub smtp_host: String,
    pub smtp_port: Option<u16>,
    pub username: Option<String>,
    pub password_env: Option<String>,
    pub tls: EmailTls,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailTls {
    None,
    #[default]
    StartTls,
    Tls,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid matching.min_phone_digits value: {0}")]
    InvalidMinPhoneDigits(usize),
    #[error("invalid forms.max_attachments value: {0}")]
    InvalidMaxAttachments(usize),
    #[error("invalid mail.{field}: {message}")]
    InvalidMailField {
        field: &'static str,
        message: String,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    matching: Option<MatchingFile>,
    forms: Option<FormsFile>,
    mail: Option<MailFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchingFile {
    min_phone_digits: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FormsFile {
    max_attachments: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MailFile {
    from: String,
    to: Vec<String>,
    smtp_host: String,
    smtp_port: Option<u16>,
    username: Option<String>,
    password_env: Option<String>,
    tls: Option<EmailTls>,
    timeout_seconds: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(min_digits) = parsed.matching.and_then(|matching| matching.min_phone_digits) {
        config.matching = MatchPolicy::new(min_digits)
            .map_err(|_| ConfigError::InvalidMinPhoneDigits(min_digits))?;
    }

    if let Some(max) = parsed.forms.and_then(|forms| forms.max_attachments) {
        if max > MAX_ATTACHMENTS_LIMIT {
            return Err(ConfigError::InvalidMaxAttachments(max));
        }
        config.forms.max_attachments = max;
    }

    if let Some(mail) = parsed.mail {
        config.mail = Some(validate_mail(mail)?);
    }

    Ok(config)
}

fn validate_mail(mail: MailFile) -> Result<MailConfig> {
    let from = mail.from.trim();
    from.parse::<Mailbox>()
        .map_err(|err| invalid_mail("from", err.to_string()))?;

    if mail.to.is_empty() {
        return Err(invalid_mail("to", "at least one recipient is required"));
    }
    let mut to = Vec::with_capacity(mail.to.len());
    for raw in &mail.to {
        let raw = raw.trim();
        raw.parse::<Mailbox>()
            .map_err(|err| invalid_mail("to", format!("{raw}: {err}")))?;
        to.push(raw.to_string());
    }

    let smtp_host = mail.smtp_host.trim();
    if smtp_host.is_empty() {
        return Err(invalid_mail("smtp_host", "cannot be empty"));
    }
    if mail.smtp_port == Some(0) {
        return Err(invalid_mail("smtp_port", "must be greater than zero"));
    }
    if mail.timeout_seconds == Some(0) {
        return Err(invalid_mail("timeout_seconds", "must be greater than zero"));
    }

    let username = trimmed_non_empty(mail.username);
    let password_env = trimmed_non_empty(mail.password_env);
    if username.is_some() != password_env.is_some() {
        return Err(invalid_mail(
            "password_env",
            "username and password_env must be set together",
        ));
    }

    Ok(MailConfig {
        from: from.to_string(),
        to,
        smtp_host: smtp_host.to_string(),
        smtp_port: mail.smtp_port,
        username,
        password_env,
        tls: mail.tls.unwrap_or_default(),
        timeout_seconds: mail.timeout_seconds,
    })
}

fn trimmed_non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn invalid_mail(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidMailField {
        field,
        message: message.into(),
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

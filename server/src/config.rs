// sellerdesk-server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use sellerdesk::MailConfig;
use std::env;
use std::time::Duration;

const DEFAULT_BREVO_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransport {
  /// Logs each message instead of sending it.
  Log,
  Brevo,
  Smtp,
}

/// Relay login for `MailTransport::Smtp`.
#[derive(Clone)]
pub struct SmtpSettings {
  pub host: String,
  pub port: u16,
  pub username: String,
  pub password: String,
}

impl std::fmt::Debug for SmtpSettings {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SmtpSettings")
      .field("host", &self.host)
      .field("port", &self.port)
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// Required when `store_backend` is `Postgres`.
  pub database_url: Option<String>,
  pub run_migrations: bool,

  pub mail_transport: MailTransport,
  pub brevo_api_key: Option<String>,
  pub brevo_api_url: String,
  /// Present only when `mail_transport` is `Smtp`.
  pub smtp: Option<SmtpSettings>,
  pub email_from_name: String,
  pub email_from_address: String,
  pub mail_timeout: Duration,

  pub json_logs: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source. Empty values count as unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_env = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = match get_env("STORE_BACKEND").as_deref().unwrap_or("postgres") {
      "postgres" => StoreBackend::Postgres,
      "memory" => StoreBackend::Memory,
      other => {
        return Err(AppError::Config(format!(
          "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
          other
        )))
      }
    };
    let database_url = get_env("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required by STORE_BACKEND=postgres)".to_string(),
      ));
    }
    let run_migrations = get_env("RUN_MIGRATIONS")
      .unwrap_or_else(|| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    let mail_transport = match get_env("MAIL_TRANSPORT").as_deref().unwrap_or("log") {
      "log" => MailTransport::Log,
      "brevo" => MailTransport::Brevo,
      "smtp" => MailTransport::Smtp,
      other => {
        return Err(AppError::Config(format!(
          "Invalid MAIL_TRANSPORT '{}': expected 'log', 'brevo' or 'smtp'",
          other
        )))
      }
    };
    let brevo_api_key = get_env("BREVO_API_KEY");
    if mail_transport == MailTransport::Brevo && brevo_api_key.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'BREVO_API_KEY' (required by MAIL_TRANSPORT=brevo)".to_string(),
      ));
    }
    let brevo_api_url = get_env("BREVO_API_URL").unwrap_or_else(|| DEFAULT_BREVO_API_URL.to_string());
    let smtp = if mail_transport == MailTransport::Smtp {
      let required = |name: &str| {
        get_env(name).ok_or_else(|| {
          AppError::Config(format!(
            "Missing environment variable '{}' (required by MAIL_TRANSPORT=smtp)",
            name
          ))
        })
      };
      let port = get_env("EMAIL_PORT")
        .unwrap_or_else(|| "465".to_string())
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid EMAIL_PORT: {}", e)))?;
      Some(SmtpSettings {
        host: required("EMAIL_HOST")?,
        port,
        username: required("EMAIL_USERNAME")?,
        password: required("EMAIL_PASSWORD")?,
      })
    } else {
      None
    };
    let email_from_name = get_env("EMAIL_FROM_NAME").unwrap_or_else(|| "Team Naaree Collections".to_string());
    // An SMTP relay sends as the account it logs in with unless told otherwise.
    let email_from_address = get_env("EMAIL_FROM_ADDRESS")
      .or_else(|| smtp.as_ref().map(|s| s.username.clone()))
      .unwrap_or_else(|| "noreply@example.com".to_string());
    let mail_timeout_secs = get_env("MAIL_TIMEOUT_SECS")
      .unwrap_or_else(|| "10".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid MAIL_TIMEOUT_SECS: {}", e)))?;
    if mail_timeout_secs == 0 {
      return Err(AppError::Config("MAIL_TIMEOUT_SECS must be at least 1".to_string()));
    }

    let json_logs = get_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      run_migrations,
      mail_transport,
      brevo_api_key,
      brevo_api_url,
      smtp,
      email_from_name,
      email_from_address,
      mail_timeout: Duration::from_secs(mail_timeout_secs),
      json_logs,
    })
  }

  pub fn mail_config(&self) -> MailConfig {
    MailConfig {
      from_name: self.email_from_name.clone(),
      from_address: self.email_from_address.clone(),
      timeout: self.mail_timeout,
    }
  }
}

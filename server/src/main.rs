// sellerdesk-server/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use sellerdesk::{Mailer, MemoryStore};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use sellerdesk_server::config::{AppConfig, MailTransport, StoreBackend};
use sellerdesk_server::db::PgStore;
use sellerdesk_server::errors::{AppError, Result as AppResult};
use sellerdesk_server::services::{BrevoMailer, LogMailer, SmtpMailer};
use sellerdesk_server::state::AppState;
use sellerdesk_server::web::configure_app_routes;

fn init_tracing(json: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

fn build_mailer(config: &AppConfig) -> AppResult<Arc<dyn Mailer>> {
  match config.mail_transport {
    MailTransport::Log => Ok(Arc::new(LogMailer::new())),
    MailTransport::Brevo => {
      let api_key = config
        .brevo_api_key
        .clone()
        .ok_or_else(|| AppError::Config("BREVO_API_KEY is not set".to_string()))?;
      Ok(Arc::new(BrevoMailer::new(config.brevo_api_url.clone(), api_key)))
    }
    MailTransport::Smtp => {
      let settings = config
        .smtp
        .as_ref()
        .ok_or_else(|| AppError::Config("EMAIL_HOST is not set".to_string()))?;
      let mailer = SmtpMailer::new(settings)
        .map_err(|e| AppError::Config(format!("Invalid SMTP relay '{}': {}", settings.host, e)))?;
      Ok(Arc::new(mailer))
    }
  }
}

async fn build_state(config: Arc<AppConfig>) -> AppResult<AppState> {
  let mailer = build_mailer(&config)?;
  match config.store_backend {
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on restart.");
      Ok(AppState::new(MemoryStore::new(), mailer, config))
    }
    StoreBackend::Postgres => {
      let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
      let store = PgStore::connect(database_url).await?;
      tracing::info!("Successfully connected to the database.");
      if config.run_migrations {
        store.run_migrations().await?;
        tracing::info!("Database migrations applied.");
      }
      Ok(AppState::new(store, mailer, config.clone()))
    }
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      init_tracing(false);
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  init_tracing(app_config.json_logs);
  tracing::info!("Starting seller-admin server...");

  let app_state = match build_state(app_config.clone()).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialise application state.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .configure(configure_app_routes)
      .wrap(tracing_actix_web::TracingLogger::default())
  })
  .bind(&server_address)?
  .run()
  .await
}

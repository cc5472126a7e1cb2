// sellerdesk/src/notification/mailer.rs

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use super::composer::Notification;
use crate::error::MailError;

/// A fully addressed message handed to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
  pub from_name: String,
  pub from_address: String,
  pub to: String,
  pub subject: String,
  pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
  pub message_id: String,
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, MailError>;
}

/// Sender identity and delivery bound, supplied at construction.
#[derive(Debug, Clone)]
pub struct MailConfig {
  pub from_name: String,
  pub from_address: String,
  pub timeout: Duration,
}

impl Default for MailConfig {
  fn default() -> Self {
    Self {
      from_name: "Team Naaree Collections".to_string(),
      from_address: "noreply@example.com".to_string(),
      timeout: Duration::from_secs(10),
    }
  }
}

/// Delivers notifications through a [`Mailer`], one attempt each, bounded by
/// [`MailConfig::timeout`].
#[derive(Clone)]
pub struct Notifier {
  mailer: Arc<dyn Mailer>,
  config: MailConfig,
}

impl Notifier {
  pub fn new(mailer: Arc<dyn Mailer>, config: MailConfig) -> Self {
    Self { mailer, config }
  }

  pub fn config(&self) -> &MailConfig {
    &self.config
  }

  /// Sends `notification` to `to`. No retry; a transport that does not
  /// answer within the configured timeout is abandoned.
  #[instrument(name = "Notifier::send", skip(self, notification), fields(subject = %notification.subject), err(Display))]
  pub async fn send(&self, to: &str, notification: &Notification) -> Result<DeliveryReceipt, MailError> {
    let email = OutboundEmail {
      from_name: self.config.from_name.clone(),
      from_address: self.config.from_address.clone(),
      to: to.to_string(),
      subject: notification.subject.clone(),
      html: notification.html.clone(),
    };

    let receipt = tokio::time::timeout(self.config.timeout, self.mailer.send(&email))
      .await
      .map_err(|_| MailError::Timeout(self.config.timeout))??;

    info!(message_id = %receipt.message_id, "Notification delivered.");
    Ok(receipt)
  }
}

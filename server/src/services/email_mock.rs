// sellerdesk-server/src/services/email_mock.rs

use async_trait::async_trait;
use sellerdesk::{DeliveryReceipt, MailError, Mailer, OutboundEmail};
use std::time::Duration;
use tracing::{info, warn};

/// Mail transport that only logs. Any subject containing `fail_test`
/// is refused, so the failure path can be exercised by hand.
#[derive(Debug, Clone)]
pub struct LogMailer {
  latency: Duration,
}

impl LogMailer {
  pub fn new() -> Self {
    Self {
      latency: Duration::from_millis(20),
    }
  }
}

impl Default for LogMailer {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Mailer for LogMailer {
  async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, MailError> {
    info!(
      "Simulating sending email: To='{}', From='{} <{}>', Subject='{}'",
      email.to, email.from_name, email.from_address, email.subject
    );
    tokio::time::sleep(self.latency).await; // Simulate network latency

    if email.subject.to_lowercase().contains("fail_test") {
      warn!("Simulated email failure for subject: {}", email.subject);
      return Err(MailError::Transport("Simulated email send failure".to_string()));
    }

    let body_preview = email.html.chars().take(50).collect::<String>() + "...";
    let message_id = format!("mock_email_{}", uuid::Uuid::new_v4());
    info!(%body_preview, "Mock email sent successfully. Message ID: {}", message_id);

    Ok(DeliveryReceipt { message_id })
  }
}

// sellerdesk-server/src/services/brevo.rs

//! Brevo transactional email transport.

use async_trait::async_trait;
use reqwest::Client;
use sellerdesk::{DeliveryReceipt, MailError, Mailer, OutboundEmail};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Serialize)]
struct Contact<'a> {
  email: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  name: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
  sender: Contact<'a>,
  to: Vec<Contact<'a>>,
  subject: &'a str,
  html_content: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
  message_id: String,
}

pub struct BrevoMailer {
  client: Client,
  api_url: String,
  api_key: String,
}

impl BrevoMailer {
  /// The caller bounds each send; the client itself sets no timeout.
  pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      client: Client::new(),
      api_url: api_url.into(),
      api_key: api_key.into(),
    }
  }
}

fn request_body(email: &OutboundEmail) -> SendRequest<'_> {
  SendRequest {
    sender: Contact {
      email: &email.from_address,
      name: Some(email.from_name.as_str()),
    },
    to: vec![Contact {
      email: &email.to,
      name: None,
    }],
    subject: &email.subject,
    html_content: &email.html,
  }
}

#[async_trait]
impl Mailer for BrevoMailer {
  #[instrument(name = "BrevoMailer::send", skip_all, fields(to = %email.to))]
  async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, MailError> {
    let response = self
      .client
      .post(&self.api_url)
      .header("api-key", &self.api_key)
      .json(&request_body(email))
      .send()
      .await
      .map_err(|e| MailError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(MailError::Rejected {
        status: status.as_u16(),
        body,
      });
    }

    let parsed: SendResponse = response
      .json()
      .await
      .map_err(|e| MailError::Transport(format!("unreadable Brevo response: {}", e)))?;
    debug!(message_id = %parsed.message_id, "Brevo accepted the message.");
    Ok(DeliveryReceipt {
      message_id: parsed.message_id,
    })
  }
}

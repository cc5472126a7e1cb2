// sellerdesk-server/src/services/smtp.rs

//! SMTP transport, for mailboxes reached with a username and password.

use crate::config::SmtpSettings;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use sellerdesk::{DeliveryReceipt, MailError, Mailer, OutboundEmail};
use tracing::{debug, instrument};

/// Port on which the relay speaks TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

pub struct SmtpMailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
  /// Port 465 connects over TLS directly. Any other port upgrades with STARTTLS.
  pub fn new(settings: &SmtpSettings) -> Result<Self, lettre::transport::smtp::Error> {
    let builder = if settings.port == IMPLICIT_TLS_PORT {
      AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
    };
    let transport = builder
      .port(settings.port)
      .credentials(Credentials::new(settings.username.clone(), settings.password.clone()))
      .build();
    Ok(Self { transport })
  }
}

fn mailbox(name: Option<&str>, address: &str) -> Result<Mailbox, MailError> {
  let address = address
    .parse::<Address>()
    .map_err(|e| MailError::Transport(format!("invalid address '{}': {}", address, e)))?;
  Ok(Mailbox::new(name.map(str::to_string), address))
}

fn build_message(email: &OutboundEmail) -> Result<Message, MailError> {
  Message::builder()
    .from(mailbox(Some(&email.from_name), &email.from_address)?)
    .to(mailbox(None, &email.to)?)
    .subject(email.subject.as_str())
    .header(ContentType::TEXT_HTML)
    .body(email.html.clone())
    .map_err(|e| MailError::Transport(format!("unbuildable message: {}", e)))
}

#[async_trait]
impl Mailer for SmtpMailer {
  #[instrument(name = "SmtpMailer::send", skip_all, fields(to = %email.to))]
  async fn send(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, MailError> {
    let message = build_message(email)?;
    let response = self
      .transport
      .send(message)
      .await
      .map_err(|e| MailError::Transport(e.to_string()))?;

    // Relays put their queue id in the reply text.
    let message_id = response.message().next().unwrap_or_default().to_string();
    debug!(code = %response.code(), %message_id, "SMTP relay accepted the message.");
    Ok(DeliveryReceipt { message_id })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn email(to: &str) -> OutboundEmail {
    OutboundEmail {
      from_name: "Team Naaree Collections".into(),
      from_address: "orders@example.com".into(),
      to: to.into(),
      subject: "Order Update: Your Order has been Shipped!".into(),
      html: "<p>On its way</p>".into(),
    }
  }

  #[test]
  fn message_carries_sender_recipient_and_html_body() {
    let message = build_message(&email("meera@example.com")).unwrap();
    let raw = String::from_utf8(message.formatted()).unwrap();

    assert!(raw.contains("Team Naaree Collections"));
    assert!(raw.contains("<orders@example.com>"));
    assert!(raw.contains("To: meera@example.com"));
    assert!(raw.contains("Subject: Order Update: Your Order has been Shipped!"));
    assert!(raw.contains("Content-Type: text/html"));
    assert!(raw.contains("<p>On its way</p>"));
  }

  #[test]
  fn malformed_recipient_is_a_transport_error() {
    let err = build_message(&email("not an address")).unwrap_err();
    assert!(matches!(err, MailError::Transport(ref m) if m.contains("not an address")));
  }

  #[test]
  fn transport_builds_for_both_tls_modes() {
    for port in [465, 587] {
      let settings = SmtpSettings {
        host: "smtp.example.com".into(),
        port,
        username: "orders@example.com".into(),
        password: "app-password".into(),
      };
      assert!(SmtpMailer::new(&settings).is_ok());
    }
  }
}

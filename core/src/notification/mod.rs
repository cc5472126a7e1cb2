// sellerdesk/src/notification/mod.rs

//! Customer notifications: rendering ([`compose`]) and delivery ([`Notifier`]).

pub mod composer;
pub mod mailer;

pub use composer::{compose, Notification, NotificationKind};
pub use mailer::{DeliveryReceipt, MailConfig, Mailer, Notifier, OutboundEmail};

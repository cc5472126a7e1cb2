// sellerdesk-server/src/services/mod.rs

pub mod brevo;
pub mod email_mock;
pub mod smtp;

pub use brevo::BrevoMailer;
pub use email_mock::LogMailer;
pub use smtp::SmtpMailer;

// sellerdesk/src/model/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::ShippingAddress;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub phone_number: Option<String>,
  pub needs_phone_number_completion: bool,
  pub addresses: Vec<ShippingAddress>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Customer fields attached to an order for presentation and notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub phone_number: Option<String>,
}

impl From<&User> for CustomerSummary {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      name: user.name.clone(),
      email: user.email.clone(),
      phone_number: user.phone_number.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
  pub name: String,
  pub email: String,
  pub password_hash: String,
  #[serde(default)]
  pub phone_number: Option<String>,
  #[serde(default)]
  pub addresses: Vec<ShippingAddress>,
}

impl NewUser {
  pub fn into_user(self, id: Uuid, now: DateTime<Utc>) -> User {
    let needs_phone_number_completion = self.phone_number.is_none();
    User {
      id,
      name: self.name.trim().to_string(),
      email: self.email.trim().to_lowercase(),
      password_hash: self.password_hash,
      phone_number: self.phone_number,
      needs_phone_number_completion,
      addresses: self.addresses,
      created_at: now,
      updated_at: now,
    }
  }
}

// sellerdesk/src/model/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use super::product::ProductSummary;
use super::user::CustomerSummary;

/// Order status. Any status may be set from any other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
  #[default]
  Pending,
  PaymentDone,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::PaymentDone,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::PaymentDone => "payment-done",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }

  /// Customer-facing form: first letter upper-cased, hyphen shown as a space.
  pub fn label(&self) -> String {
    let spaced = self.as_str().replacen('-', " ", 1);
    let mut chars = spaced.chars();
    match chars.next() {
      Some(first) => first.to_uppercase().chain(chars).collect(),
      None => String::new(),
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid order status (expected one of pending, payment-done, shipped, delivered, cancelled)")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
  type Err = ParseStatusError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| ParseStatusError(s.to_string()))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
  pub street: String,
  pub city: String,
  pub state: String,
  pub zip_code: String,
  pub country: String,
  /// Contact number the customer is reached on.
  pub whatsapp_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  pub product_id: Uuid,
  pub quantity: u32,
  /// Unit price at the time of purchase.
  pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub items: Vec<LineItem>,
  pub shipping_address: ShippingAddress,
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input for recording a new order. New orders always start `pending`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
  pub user_id: Uuid,
  pub items: Vec<LineItem>,
  pub shipping_address: ShippingAddress,
  pub total_amount: Decimal,
}

impl NewOrder {
  pub fn validate(&self) -> Result<(), String> {
    if self.items.is_empty() {
      return Err("an order needs at least one line item".to_string());
    }
    if let Some(item) = self.items.iter().find(|i| i.quantity == 0) {
      return Err(format!("line item for product {} has quantity 0", item.product_id));
    }
    if let Some(item) = self.items.iter().find(|i| i.price.is_sign_negative()) {
      return Err(format!("line item for product {} has a negative price", item.product_id));
    }
    if self.total_amount.is_sign_negative() {
      return Err("total amount cannot be negative".to_string());
    }
    Ok(())
  }

  pub fn into_order(self, id: Uuid, now: DateTime<Utc>) -> Order {
    Order {
      id,
      user_id: self.user_id,
      items: self.items,
      shipping_address: self.shipping_address,
      total_amount: self.total_amount,
      status: OrderStatus::Pending,
      created_at: now,
      updated_at: now,
    }
  }
}

/// A line item with its product resolved. `product` is `None` when the
/// product has since been removed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
  pub product_id: Uuid,
  pub product: Option<ProductSummary>,
  pub quantity: u32,
  pub price: Decimal,
}

impl LineItemView {
  pub fn line_total(&self) -> Decimal {
    self.price * Decimal::from(self.quantity)
  }
}

/// An order with its customer and products resolved, as served to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
  pub id: Uuid,
  pub user: Option<CustomerSummary>,
  pub items: Vec<LineItemView>,
  pub shipping_address: ShippingAddress,
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl OrderView {
  /// The address to notify, if the customer has a non-blank one.
  pub fn customer_email(&self) -> Option<&str> {
    self
      .user
      .as_ref()
      .map(|u| u.email.trim())
      .filter(|email| !email.is_empty())
  }
}

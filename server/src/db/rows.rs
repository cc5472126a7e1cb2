// sellerdesk-server/src/db/rows.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sellerdesk::{
  Availability, CustomerSummary, LineItemView, OrderView, ParseStatusError, Product, ProductSummary, ProductType,
  ShippingAddress, StoreError, User,
};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

fn corrupt(what: String) -> StoreError {
  StoreError::Backend {
    source: anyhow::anyhow!("corrupt row: {}", what),
  }
}

fn non_negative(value: i32, column: &str) -> Result<u32, StoreError> {
  u32::try_from(value).map_err(|_| corrupt(format!("{} is negative ({})", column, value)))
}

#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
  pub id: Uuid,
  pub name: String,
  pub fabric_type: Option<String>,
  pub regional_varieties: Option<String>,
  pub price: Decimal,
  pub discounts: Option<Decimal>,
  pub sizes: Vec<String>,
  pub availability: Option<String>,
  pub product_type: Option<String>,
  pub short_description: Option<String>,
  pub images: Vec<String>,
  pub quantity: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
  type Error = StoreError;

  fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
    Ok(Product {
      id: row.id,
      name: row.name,
      fabric_type: row.fabric_type,
      regional_varieties: row.regional_varieties,
      price: row.price,
      discounts: row.discounts,
      sizes: row.sizes,
      availability: row.availability.map(|a| a.parse::<Availability>()).transpose().map_err(corrupt)?,
      product_type: row.product_type.map(|t| t.parse::<ProductType>()).transpose().map_err(corrupt)?,
      short_description: row.short_description,
      images: row.images,
      quantity: non_negative(row.quantity, "products.quantity")?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub password_hash: String,
  pub phone_number: Option<String>,
  pub needs_phone_number_completion: bool,
  pub addresses: Json<Vec<ShippingAddress>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User {
      id: row.id,
      name: row.name,
      email: row.email,
      password_hash: row.password_hash,
      phone_number: row.phone_number,
      needs_phone_number_completion: row.needs_phone_number_completion,
      addresses: row.addresses.0,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

/// An order joined with its customer; the customer columns are null when
/// the user no longer exists.
#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
  pub id: Uuid,
  pub user_id: Uuid,
  pub street: String,
  pub city: String,
  pub state: String,
  pub zip_code: String,
  pub country: String,
  pub whatsapp_number: String,
  pub total_amount: Decimal,
  pub status: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub customer_name: Option<String>,
  pub customer_email: Option<String>,
  pub customer_phone: Option<String>,
}

/// A line item joined with its product, if the product still exists.
#[derive(Debug, FromRow)]
pub(crate) struct ItemRow {
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub price: Decimal,
  pub product_name: Option<String>,
  pub product_price: Option<Decimal>,
}

impl ItemRow {
  pub fn into_view(self) -> Result<LineItemView, StoreError> {
    let product = match (self.product_name, self.product_price) {
      (Some(name), Some(price)) => Some(ProductSummary {
        id: self.product_id,
        name,
        price,
      }),
      _ => None,
    };
    Ok(LineItemView {
      product_id: self.product_id,
      product,
      quantity: non_negative(self.quantity, "order_items.quantity")?,
      price: self.price,
    })
  }
}

impl OrderRow {
  pub fn into_view(self, items: Vec<LineItemView>) -> Result<OrderView, StoreError> {
    let user = match (self.customer_name, self.customer_email) {
      (Some(name), Some(email)) => Some(CustomerSummary {
        id: self.user_id,
        name,
        email,
        phone_number: self.customer_phone,
      }),
      _ => None,
    };
    Ok(OrderView {
      id: self.id,
      user,
      items,
      shipping_address: ShippingAddress {
        street: self.street,
        city: self.city,
        state: self.state,
        zip_code: self.zip_code,
        country: self.country,
        whatsapp_number: self.whatsapp_number,
      },
      total_amount: self.total_amount,
      status: self.status.parse().map_err(|e: ParseStatusError| corrupt(e.to_string()))?,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}

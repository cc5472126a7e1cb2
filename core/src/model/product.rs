// sellerdesk/src/model/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
  #[serde(rename = "In Stock")]
  InStock,
  #[serde(rename = "Out of Stock")]
  OutOfStock,
  #[serde(rename = "Limited")]
  Limited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
  Saree,
  Suits,
  BoutiqueFabrics,
  Accessories,
}

impl Availability {
  pub const ALL: [Availability; 3] = [Availability::InStock, Availability::OutOfStock, Availability::Limited];

  pub fn as_str(&self) -> &'static str {
    match self {
      Availability::InStock => "In Stock",
      Availability::OutOfStock => "Out of Stock",
      Availability::Limited => "Limited",
    }
  }
}

impl FromStr for Availability {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Availability::ALL
      .into_iter()
      .find(|a| a.as_str() == s)
      .ok_or_else(|| format!("unknown availability '{}'", s))
  }
}

impl ProductType {
  pub const ALL: [ProductType; 4] = [
    ProductType::Saree,
    ProductType::Suits,
    ProductType::BoutiqueFabrics,
    ProductType::Accessories,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ProductType::Saree => "saree",
      ProductType::Suits => "suits",
      ProductType::BoutiqueFabrics => "boutique-fabrics",
      ProductType::Accessories => "accessories",
    }
  }
}

impl FromStr for ProductType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ProductType::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| format!("unknown product type '{}'", s))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub fabric_type: Option<String>,
  pub regional_varieties: Option<String>,
  pub price: Decimal,
  pub discounts: Option<Decimal>,
  pub sizes: Vec<String>,
  pub availability: Option<Availability>,
  pub product_type: Option<ProductType>,
  pub short_description: Option<String>,
  /// URL paths of uploaded images; the files live outside this service.
  pub images: Vec<String>,
  /// Units in stock. Only the inventory ledger changes this after creation.
  pub quantity: u32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// The slice of a product shown next to an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
  pub id: Uuid,
  pub name: String,
  pub price: Decimal,
}

impl From<&Product> for ProductSummary {
  fn from(product: &Product) -> Self {
    Self {
      id: product.id,
      name: product.name.clone(),
      price: product.price,
    }
  }
}

fn default_quantity() -> u32 {
  1
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
  pub name: String,
  #[serde(default)]
  pub fabric_type: Option<String>,
  #[serde(default)]
  pub regional_varieties: Option<String>,
  pub price: Decimal,
  #[serde(default)]
  pub discounts: Option<Decimal>,
  #[serde(default)]
  pub sizes: Vec<String>,
  #[serde(default)]
  pub availability: Option<Availability>,
  #[serde(default)]
  pub product_type: Option<ProductType>,
  #[serde(default)]
  pub short_description: Option<String>,
  #[serde(default)]
  pub images: Vec<String>,
  #[serde(default = "default_quantity")]
  pub quantity: u32,
}

impl NewProduct {
  pub fn validate(&self) -> Result<(), String> {
    if self.name.trim().is_empty() {
      return Err("product name cannot be empty".to_string());
    }
    if self.price.is_sign_negative() {
      return Err("price cannot be negative".to_string());
    }
    if self.discounts.is_some_and(|d| d.is_sign_negative()) {
      return Err("discounts cannot be negative".to_string());
    }
    Ok(())
  }

  pub fn into_product(self, id: Uuid, now: DateTime<Utc>) -> Product {
    Product {
      id,
      name: self.name,
      fabric_type: self.fabric_type,
      regional_varieties: self.regional_varieties,
      price: self.price,
      discounts: self.discounts,
      sizes: self.sizes,
      availability: self.availability,
      product_type: self.product_type,
      short_description: self.short_description,
      images: self.images,
      quantity: self.quantity,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Partial product update. Absent fields are left untouched; `images`
/// replaces the whole list when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
  pub name: Option<String>,
  pub fabric_type: Option<String>,
  pub regional_varieties: Option<String>,
  pub price: Option<Decimal>,
  pub discounts: Option<Decimal>,
  pub sizes: Option<Vec<String>>,
  pub availability: Option<Availability>,
  pub product_type: Option<ProductType>,
  pub short_description: Option<String>,
  pub images: Option<Vec<String>>,
  pub quantity: Option<u32>,
}

impl ProductPatch {
  pub fn validate(&self) -> Result<(), String> {
    if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
      return Err("product name cannot be empty".to_string());
    }
    if self.price.is_some_and(|p| p.is_sign_negative()) {
      return Err("price cannot be negative".to_string());
    }
    if self.discounts.is_some_and(|d| d.is_sign_negative()) {
      return Err("discounts cannot be negative".to_string());
    }
    Ok(())
  }
}

impl Product {
  pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(fabric_type) = patch.fabric_type {
      self.fabric_type = Some(fabric_type);
    }
    if let Some(regional_varieties) = patch.regional_varieties {
      self.regional_varieties = Some(regional_varieties);
    }
    if let Some(price) = patch.price {
      self.price = price;
    }
    if let Some(discounts) = patch.discounts {
      self.discounts = Some(discounts);
    }
    if let Some(sizes) = patch.sizes {
      self.sizes = sizes;
    }
    if let Some(availability) = patch.availability {
      self.availability = Some(availability);
    }
    if let Some(product_type) = patch.product_type {
      self.product_type = Some(product_type);
    }
    if let Some(short_description) = patch.short_description {
      self.short_description = Some(short_description);
    }
    if let Some(images) = patch.images {
      self.images = images;
    }
    if let Some(quantity) = patch.quantity {
      self.quantity = quantity;
    }
    self.updated_at = now;
  }
}

// sellerdesk/src/store/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{CustomerDirectory, InventoryLedger, OrderStore, ProductCatalog, StoreResult};
use crate::error::StoreError;
use crate::model::{
  CustomerSummary, LineItemView, NewOrder, NewProduct, NewUser, Order, OrderStatus, OrderView, Product, ProductPatch,
  ProductSummary, User,
};

#[derive(Debug, Default)]
struct Tables {
  users: HashMap<Uuid, User>,
  products: HashMap<Uuid, Product>,
  orders: HashMap<Uuid, Order>,
}

impl Tables {
  fn resolve(&self, order: &Order) -> OrderView {
    OrderView {
      id: order.id,
      user: self.users.get(&order.user_id).map(CustomerSummary::from),
      items: order
        .items
        .iter()
        .map(|item| LineItemView {
          product_id: item.product_id,
          product: self.products.get(&item.product_id).map(ProductSummary::from),
          quantity: item.quantity,
          price: item.price,
        })
        .collect(),
      shipping_address: order.shipping_address.clone(),
      total_amount: order.total_amount,
      status: order.status,
      created_at: order.created_at,
      updated_at: order.updated_at,
    }
  }
}

/// In-process store implementing every persistence trait.
///
/// Clones share the same tables. Each trait call takes the lock once, so
/// every write is atomic with respect to other calls.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn list_orders(&self) -> StoreResult<Vec<OrderView>> {
    let tables = self.tables.lock();
    let mut orders: Vec<&Order> = tables.orders.values().collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(orders.into_iter().map(|o| tables.resolve(o)).collect())
  }

  async fn find_order(&self, order_id: Uuid) -> StoreResult<Option<OrderView>> {
    let tables = self.tables.lock();
    Ok(tables.orders.get(&order_id).map(|o| tables.resolve(o)))
  }

  async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> StoreResult<Option<OrderView>> {
    let mut tables = self.tables.lock();
    let updated = match tables.orders.get_mut(&order_id) {
      Some(order) => {
        order.status = status;
        order.updated_at = Utc::now();
        order.clone()
      }
      None => return Ok(None),
    };
    Ok(Some(tables.resolve(&updated)))
  }

  async fn remove_order(&self, order_id: Uuid) -> StoreResult<bool> {
    Ok(self.tables.lock().orders.remove(&order_id).is_some())
  }

  async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderView> {
    order.validate().map_err(StoreError::Rejected)?;
    let order = order.into_order(Uuid::new_v4(), Utc::now());
    let mut tables = self.tables.lock();
    let view = tables.resolve(&order);
    tables.orders.insert(order.id, order);
    Ok(view)
  }
}

#[async_trait]
impl InventoryLedger for MemoryStore {
  async fn increment_stock(&self, product_id: Uuid, quantity: u32) -> StoreResult<()> {
    let mut tables = self.tables.lock();
    let product = tables
      .products
      .get_mut(&product_id)
      .ok_or_else(|| StoreError::NotFound(format!("product {}", product_id)))?;
    product.quantity = product
      .quantity
      .checked_add(quantity)
      .ok_or_else(|| StoreError::Rejected(format!("stock for product {} would overflow", product_id)))?;
    product.updated_at = Utc::now();
    Ok(())
  }
}

#[async_trait]
impl ProductCatalog for MemoryStore {
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let mut products: Vec<Product> = self.tables.lock().products.values().cloned().collect();
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(products)
  }

  async fn get_product(&self, product_id: Uuid) -> StoreResult<Option<Product>> {
    Ok(self.tables.lock().products.get(&product_id).cloned())
  }

  async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
    product.validate().map_err(StoreError::Rejected)?;
    let product = product.into_product(Uuid::new_v4(), Utc::now());
    self.tables.lock().products.insert(product.id, product.clone());
    Ok(product)
  }

  async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> StoreResult<Option<Product>> {
    patch.validate().map_err(StoreError::Rejected)?;
    let mut tables = self.tables.lock();
    Ok(tables.products.get_mut(&product_id).map(|product| {
      product.apply(patch, Utc::now());
      product.clone()
    }))
  }

  async fn delete_product(&self, product_id: Uuid) -> StoreResult<bool> {
    Ok(self.tables.lock().products.remove(&product_id).is_some())
  }
}

#[async_trait]
impl CustomerDirectory for MemoryStore {
  async fn list_users(&self) -> StoreResult<Vec<User>> {
    let mut users: Vec<User> = self.tables.lock().users.values().cloned().collect();
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(users)
  }

  async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<User>> {
    Ok(self.tables.lock().users.get(&user_id).cloned())
  }

  async fn create_user(&self, user: NewUser) -> StoreResult<User> {
    let user = user.into_user(Uuid::new_v4(), Utc::now());
    let mut tables = self.tables.lock();
    if tables.users.values().any(|u| u.email == user.email) {
      return Err(StoreError::Rejected(format!("email {} is already registered", user.email)));
    }
    tables.users.insert(user.id, user.clone());
    Ok(user)
  }
}

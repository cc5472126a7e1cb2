// sellerdesk/src/store/mod.rs

//! Persistence collaborators.
//!
//! Each trait covers one concern of the document store the backend sits on.
//! Every write is expected to be atomic per record; callers never hold a
//! read value and write it back.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{NewOrder, NewProduct, NewUser, OrderStatus, OrderView, Product, ProductPatch, User};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// All orders with customer and product fields resolved, newest first.
  async fn list_orders(&self) -> StoreResult<Vec<OrderView>>;

  async fn find_order(&self, order_id: Uuid) -> StoreResult<Option<OrderView>>;

  /// Overwrites the status in a single write and returns the resolved order,
  /// or `None` if no such order exists.
  async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> StoreResult<Option<OrderView>>;

  /// Returns `false` if there was nothing to remove.
  async fn remove_order(&self, order_id: Uuid) -> StoreResult<bool>;

  async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderView>;
}

#[async_trait]
pub trait InventoryLedger: Send + Sync {
  /// Adds `quantity` units to the product's stock in one atomic update.
  ///
  /// Fails with [`StoreError::NotFound`] if the product does not exist.
  async fn increment_stock(&self, product_id: Uuid, quantity: u32) -> StoreResult<()>;
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
  /// Newest first.
  async fn list_products(&self) -> StoreResult<Vec<Product>>;

  async fn get_product(&self, product_id: Uuid) -> StoreResult<Option<Product>>;

  async fn create_product(&self, product: NewProduct) -> StoreResult<Product>;

  async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> StoreResult<Option<Product>>;

  async fn delete_product(&self, product_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
  async fn list_users(&self) -> StoreResult<Vec<User>>;

  async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<User>>;

  async fn create_user(&self, user: NewUser) -> StoreResult<User>;
}

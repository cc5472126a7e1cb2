// sellerdesk-server/src/db/pg_store.rs

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use sellerdesk::{
  CustomerDirectory, InventoryLedger, LineItemView, NewOrder, NewProduct, NewUser, OrderStatus, OrderStore, OrderView,
  Product, ProductCatalog, ProductPatch, StoreError, StoreResult, User,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::rows::{ItemRow, OrderRow, ProductRow, UserRow};
use super::store_error;

macro_rules! product_columns {
  () => {
    "id, name, fabric_type, regional_varieties, price, discounts, sizes, availability, product_type, \
     short_description, images, quantity, created_at, updated_at"
  };
}

macro_rules! user_columns {
  () => {
    "id, name, email, password_hash, phone_number, needs_phone_number_completion, addresses, created_at, updated_at"
  };
}

macro_rules! order_select {
  () => {
    "SELECT o.id, o.user_id, o.street, o.city, o.state, o.zip_code, o.country, o.whatsapp_number, \
     o.total_amount, o.status::text AS status, o.created_at, o.updated_at, \
     u.name AS customer_name, u.email AS customer_email, u.phone_number AS customer_phone \
     FROM orders o LEFT JOIN users u ON u.id = o.user_id"
  };
}

const ITEMS_FOR_ORDERS: &str = "SELECT i.order_id, i.product_id, i.quantity, i.price, \
  p.name AS product_name, p.price AS product_price \
  FROM order_items i LEFT JOIN products p ON p.id = i.product_id \
  WHERE i.order_id = ANY($1) ORDER BY i.order_id, i.position";

fn to_i32(value: u32, what: &str) -> StoreResult<i32> {
  i32::try_from(value).map_err(|_| StoreError::Rejected(format!("{} {} is out of range", what, value)))
}

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
    let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
    Ok(Self::new(pool))
  }

  pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(&self.pool).await
  }

  /// Attaches line items to each order row, keeping the rows' order.
  async fn resolve(&self, rows: Vec<OrderRow>) -> StoreResult<Vec<OrderView>> {
    if rows.is_empty() {
      return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let mut items: HashMap<Uuid, Vec<LineItemView>> = HashMap::new();
    let mut stream = sqlx::query_as::<_, ItemRow>(ITEMS_FOR_ORDERS).bind(&ids).fetch(&self.pool);
    while let Some(row) = stream.try_next().await.map_err(store_error)? {
      items.entry(row.order_id).or_default().push(row.into_view()?);
    }

    rows
      .into_iter()
      .map(|row| {
        let lines = items.remove(&row.id).unwrap_or_default();
        row.into_view(lines)
      })
      .collect()
  }
}

#[async_trait]
impl OrderStore for PgStore {
  async fn list_orders(&self) -> StoreResult<Vec<OrderView>> {
    let rows = sqlx::query_as::<_, OrderRow>(concat!(order_select!(), " ORDER BY o.created_at DESC"))
      .fetch_all(&self.pool)
      .await
      .map_err(store_error)?;
    self.resolve(rows).await
  }

  async fn find_order(&self, order_id: Uuid) -> StoreResult<Option<OrderView>> {
    let row = sqlx::query_as::<_, OrderRow>(concat!(order_select!(), " WHERE o.id = $1"))
      .bind(order_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error)?;
    match row {
      Some(row) => Ok(self.resolve(vec![row]).await?.pop()),
      None => Ok(None),
    }
  }

  #[instrument(name = "PgStore::set_status", skip(self), err(Display))]
  async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> StoreResult<Option<OrderView>> {
    let updated = sqlx::query_scalar::<_, Uuid>(
      "UPDATE orders SET status = $2::order_status_enum, updated_at = NOW() WHERE id = $1 RETURNING id",
    )
    .bind(order_id)
    .bind(status.as_str())
    .fetch_optional(&self.pool)
    .await
    .map_err(store_error)?;

    match updated {
      Some(_) => self.find_order(order_id).await,
      None => Ok(None),
    }
  }

  async fn remove_order(&self, order_id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(order_id)
      .execute(&self.pool)
      .await
      .map_err(store_error)?;
    Ok(result.rows_affected() > 0)
  }

  async fn insert_order(&self, order: NewOrder) -> StoreResult<OrderView> {
    order.validate().map_err(StoreError::Rejected)?;
    let order = order.into_order(Uuid::new_v4(), Utc::now());
    let address = &order.shipping_address;

    let mut tx = self.pool.begin().await.map_err(store_error)?;
    sqlx::query(
      "INSERT INTO orders (id, user_id, street, city, state, zip_code, country, whatsapp_number, \
       total_amount, status, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10::order_status_enum, $11, $12)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(&address.street)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.zip_code)
    .bind(&address.country)
    .bind(&address.whatsapp_number)
    .bind(order.total_amount)
    .bind(order.status.as_str())
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *tx)
    .await
    .map_err(store_error)?;

    for (position, item) in order.items.iter().enumerate() {
      let position = i32::try_from(position)
        .map_err(|_| StoreError::Rejected("an order cannot hold that many line items".to_string()))?;
      sqlx::query(
        "INSERT INTO order_items (order_id, position, product_id, quantity, price) VALUES ($1, $2, $3, $4, $5)",
      )
      .bind(order.id)
      .bind(position)
      .bind(item.product_id)
      .bind(to_i32(item.quantity, "quantity")?)
      .bind(item.price)
      .execute(&mut *tx)
      .await
      .map_err(store_error)?;
    }
    tx.commit().await.map_err(store_error)?;

    self
      .find_order(order.id)
      .await?
      .ok_or_else(|| StoreError::NotFound(format!("order {}", order.id)))
  }
}

#[async_trait]
impl InventoryLedger for PgStore {
  #[instrument(name = "PgStore::increment_stock", skip(self), err(Display))]
  async fn increment_stock(&self, product_id: Uuid, quantity: u32) -> StoreResult<()> {
    // Single statement: concurrent increments never lose an update.
    let result = sqlx::query("UPDATE products SET quantity = quantity + $2, updated_at = NOW() WHERE id = $1")
      .bind(product_id)
      .bind(to_i32(quantity, "quantity")?)
      .execute(&self.pool)
      .await
      .map_err(store_error)?;

    if result.rows_affected() == 0 {
      return Err(StoreError::NotFound(format!("product {}", product_id)));
    }
    debug!(%product_id, quantity, "Stock incremented.");
    Ok(())
  }
}

#[async_trait]
impl ProductCatalog for PgStore {
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    sqlx::query_as::<_, ProductRow>(concat!(
      "SELECT ",
      product_columns!(),
      " FROM products ORDER BY created_at DESC"
    ))
    .fetch_all(&self.pool)
    .await
    .map_err(store_error)?
    .into_iter()
    .map(Product::try_from)
    .collect()
  }

  async fn get_product(&self, product_id: Uuid) -> StoreResult<Option<Product>> {
    sqlx::query_as::<_, ProductRow>(concat!("SELECT ", product_columns!(), " FROM products WHERE id = $1"))
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error)?
      .map(Product::try_from)
      .transpose()
  }

  async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
    product.validate().map_err(StoreError::Rejected)?;
    let product = product.into_product(Uuid::new_v4(), Utc::now());

    let row = sqlx::query_as::<_, ProductRow>(concat!(
      "INSERT INTO products (",
      product_columns!(),
      ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING ",
      product_columns!()
    ))
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.fabric_type)
    .bind(&product.regional_varieties)
    .bind(product.price)
    .bind(product.discounts)
    .bind(&product.sizes)
    .bind(product.availability.map(|a| a.as_str()))
    .bind(product.product_type.map(|t| t.as_str()))
    .bind(&product.short_description)
    .bind(&product.images)
    .bind(to_i32(product.quantity, "quantity")?)
    .bind(product.created_at)
    .bind(product.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(store_error)?;
    Product::try_from(row)
  }

  async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> StoreResult<Option<Product>> {
    patch.validate().map_err(StoreError::Rejected)?;
    let quantity = patch.quantity.map(|q| to_i32(q, "quantity")).transpose()?;

    sqlx::query_as::<_, ProductRow>(concat!(
      "UPDATE products SET name = COALESCE($2, name), fabric_type = COALESCE($3, fabric_type), \
       regional_varieties = COALESCE($4, regional_varieties), price = COALESCE($5, price), \
       discounts = COALESCE($6, discounts), sizes = COALESCE($7, sizes), \
       availability = COALESCE($8, availability), product_type = COALESCE($9, product_type), \
       short_description = COALESCE($10, short_description), images = COALESCE($11, images), \
       quantity = COALESCE($12, quantity), updated_at = NOW() WHERE id = $1 RETURNING ",
      product_columns!()
    ))
    .bind(product_id)
    .bind(patch.name)
    .bind(patch.fabric_type)
    .bind(patch.regional_varieties)
    .bind(patch.price)
    .bind(patch.discounts)
    .bind(patch.sizes)
    .bind(patch.availability.map(|a| a.as_str()))
    .bind(patch.product_type.map(|t| t.as_str()))
    .bind(patch.short_description)
    .bind(patch.images)
    .bind(quantity)
    .fetch_optional(&self.pool)
    .await
    .map_err(store_error)?
    .map(Product::try_from)
    .transpose()
  }

  async fn delete_product(&self, product_id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(product_id)
      .execute(&self.pool)
      .await
      .map_err(store_error)?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl CustomerDirectory for PgStore {
  async fn list_users(&self) -> StoreResult<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>(concat!("SELECT ", user_columns!(), " FROM users ORDER BY created_at ASC"))
      .fetch_all(&self.pool)
      .await
      .map_err(store_error)?;
    Ok(rows.into_iter().map(User::from).collect())
  }

  async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(concat!("SELECT ", user_columns!(), " FROM users WHERE id = $1"))
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_error)?;
    Ok(row.map(User::from))
  }

  async fn create_user(&self, user: NewUser) -> StoreResult<User> {
    let user = user.into_user(Uuid::new_v4(), Utc::now());
    let row = sqlx::query_as::<_, UserRow>(concat!(
      "INSERT INTO users (",
      user_columns!(),
      ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING ",
      user_columns!()
    ))
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.phone_number)
    .bind(user.needs_phone_number_completion)
    .bind(Json(&user.addresses))
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(store_error)?;
    Ok(User::from(row))
  }
}

// sellerdesk-server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use sellerdesk::{OrderStatus, OrderView};

#[derive(Deserialize, Debug)]
pub struct StatusUpdatePayload {
  pub status: String,
}

/// The updated order with the delivery flag alongside its fields.
#[derive(Serialize, Debug)]
pub struct StatusUpdateResponse {
  #[serde(flatten)]
  pub order: OrderView,
  pub notified: bool,
}

#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = app_state.lifecycle.list_orders().await?;
  info!("Successfully fetched {} orders.", orders.len());
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.lifecycle.get_order(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(
  name = "handler::update_order_status",
  skip(app_state, path, payload),
  fields(order_id = %path.as_ref(), requested = %payload.status)
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<StatusUpdatePayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let status: OrderStatus = payload.status.parse().map_err(|e: sellerdesk::ParseStatusError| {
    warn!("Rejected status update for order {}: {}", order_id, e);
    AppError::Validation(e.to_string())
  })?;

  let updated = app_state.lifecycle.update_status(order_id, status).await?;
  if !updated.notified {
    warn!("Order {} moved to '{}' but the customer was not notified.", order_id, status);
  }

  Ok(HttpResponse::Ok().json(StatusUpdateResponse {
    order: updated.order,
    notified: updated.notified,
  }))
}

#[instrument(name = "handler::delete_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn delete_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let deleted = app_state.lifecycle.delete_order(path.into_inner()).await?;
  info!(
    "Order {} deleted. Notified: {}. Line items restocked: {}/{}.",
    deleted.order_id,
    deleted.notified,
    deleted.restocks.iter().filter(|r| r.restocked()).count(),
    deleted.restocks.len()
  );

  Ok(HttpResponse::Ok().json(json!({
      "message": "Order deleted successfully",
      "notified": deleted.notified,
  })))
}

// sellerdesk-server/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_users", skip(app_state))]
pub async fn list_users_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let users = app_state.customers.list_users().await?;
  info!("Successfully fetched {} users.", users.len());
  Ok(HttpResponse::Ok().json(users))
}

// sellerdesk-server/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{order_handlers, product_handlers, user_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed ids and bodies become 400s with the usual `{error}` body.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
      AppError::Validation(format!("Invalid path parameter: {}", err)).into()
    }))
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
      AppError::Validation(format!("Invalid request body: {}", err)).into()
    }));
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  extractor_configs(cfg);
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/orders")
        .route("", web::get().to(order_handlers::list_orders_handler))
        .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
        .route("/{order_id}", web::delete().to(order_handlers::delete_order_handler))
        .route(
          "/{order_id}/status",
          web::put().to(order_handlers::update_order_status_handler),
        ),
    )
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("", web::post().to(product_handlers::create_product_handler))
        .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
        .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
        .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
    )
    .service(web::scope("/users").route("", web::get().to(user_handlers::list_users_handler)));
}

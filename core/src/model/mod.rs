// sellerdesk/src/model/mod.rs

//! Data structures for orders, products and customers.

pub mod order;
pub mod product;
pub mod user;

pub use order::{LineItem, LineItemView, NewOrder, Order, OrderStatus, OrderView, ParseStatusError, ShippingAddress};
pub use product::{Availability, NewProduct, Product, ProductPatch, ProductSummary, ProductType};
pub use user::{CustomerSummary, NewUser, User};

// sellerdesk/src/notification/composer.rs

//! Renders the email sent when an order changes state.
//!
//! [`compose`] is a pure function of the order snapshot and the event: the
//! same inputs always give the same subject and body.

use html_escape::encode_quoted_attribute as escape_html;
use rust_decimal::Decimal;

use crate::model::{OrderStatus, OrderView};

const CELL_STYLE: &str = "padding:8px; border:1px solid #ddd;";
const UNKNOWN_PRODUCT: &str = "Unavailable product";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
  StatusUpdate(OrderStatus),
  Cancellation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub subject: String,
  pub html: String,
}

pub fn compose(order: &OrderView, kind: NotificationKind) -> Notification {
  let subject = match kind {
    NotificationKind::StatusUpdate(status) => {
      format!("Order Status Update: Your Order #{} is now {}", order.id, status)
    }
    NotificationKind::Cancellation => {
      format!("Order Cancellation: Your Order #{} has been cancelled", order.id)
    }
  };

  let customer_name = order
    .user
    .as_ref()
    .map(|u| u.name.trim())
    .filter(|name| !name.is_empty())
    .unwrap_or("Customer");

  let (heading_colour, intro, closing) = match kind {
    NotificationKind::StatusUpdate(status) => (
      "#4CAF50",
      format!(
        "<p>Your order status has been updated!</p>\n<p>The new status for your Order ID: <strong>{}</strong> is: <strong>{}</strong></p>",
        order.id,
        status.label()
      ),
      "We will contact you shortly on your WhatsApp number provided above if needed.",
    ),
    NotificationKind::Cancellation => (
      "#FF0000",
      format!(
        "<p>We regret to inform you that your order has been cancelled by the shipper.</p>\n<p>Your Order ID: <strong>{}</strong> has been cancelled.</p>",
        order.id
      ),
      "We apologize for any inconvenience this may cause.",
    ),
  };

  let mut html = String::new();
  html.push_str("<div style=\"font-family: Arial, sans-serif; color: #333; line-height: 1.6;\">\n");
  html.push_str(&format!(
    "<h2 style=\"color:{};\">Hi {},</h2>\n",
    heading_colour,
    escape_html(customer_name)
  ));
  html.push_str(&intro);
  html.push('\n');
  html.push_str(&order_details(order));
  html.push_str(&format!("<p style=\"margin-top:20px;\">{}</p>\n", closing));
  html.push_str("<p>Best regards, <br/> <strong>Team Naaree Collections</strong></p>\n");
  html.push_str("</div>\n");

  Notification { subject, html }
}

fn order_details(order: &OrderView) -> String {
  let mut html = String::new();
  html.push_str("<h3>Order Details</h3>\n");
  html.push_str(&format!("<p><strong>Order ID:</strong> {}</p>\n", order.id));
  html.push_str("<table style=\"width:100%; border-collapse: collapse; margin-top:15px;\">\n<thead>\n<tr style=\"background-color:#f8f8f8;\">");
  for header in ["Qty", "Product", "Price", "Total"] {
    html.push_str(&format!("<th style=\"{}\">{}</th>", CELL_STYLE, header));
  }
  html.push_str("</tr>\n</thead>\n<tbody>\n");

  for item in &order.items {
    let product_name = item.product.as_ref().map_or(UNKNOWN_PRODUCT, |p| p.name.as_str());
    html.push_str("<tr>");
    html.push_str(&format!("<td style=\"{}\">{}</td>", CELL_STYLE, item.quantity));
    html.push_str(&format!("<td style=\"{}\">{}</td>", CELL_STYLE, escape_html(product_name)));
    html.push_str(&format!("<td style=\"{}\">{}</td>", CELL_STYLE, rupees(item.price)));
    html.push_str(&format!("<td style=\"{}\">{}</td>", CELL_STYLE, rupees(item.line_total())));
    html.push_str("</tr>\n");
  }
  html.push_str("</tbody>\n</table>\n");

  html.push_str(&format!(
    "<p style=\"margin-top:15px;\"><strong>Total Amount:</strong> {}</p>\n",
    rupees(order.total_amount)
  ));

  let address = &order.shipping_address;
  html.push_str("<h3>Shipping Address</h3>\n<p>\n");
  html.push_str(&format!(
    "{}, {}, {} <br/>\n{}, {} <br/>\n<strong>WhatsApp:</strong> {}\n",
    escape_html(&address.street),
    escape_html(&address.city),
    escape_html(&address.state),
    escape_html(&address.zip_code),
    escape_html(&address.country),
    escape_html(&address.whatsapp_number)
  ));
  html.push_str("</p>\n");
  html
}

fn rupees(amount: Decimal) -> String {
  format!("₹{:.2}", amount.round_dp(2))
}

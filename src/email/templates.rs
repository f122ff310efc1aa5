use std::fmt::Write;

use crate::{cart::AttributeSnapshot, pricing::format_price};

#[derive(Debug, Clone)]
pub struct OrderEmailLine {
    pub name: String,
    pub attributes: Vec<AttributeSnapshot>,
    pub quantity: i32,
    pub unit_price: i64,
    pub discount: Option<i32>,
    pub line_total: i64,
}

#[derive(Debug, Clone)]
pub struct OrderEmail {
    pub site_name: String,
    pub currency: String,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub phone: Option<String>,
    pub note: Option<String>,
    /// Pre-formatted lines of the shipping address.
    pub shipping_address: Vec<String>,
    pub lines: Vec<OrderEmailLine>,
    pub subtotal: i64,
    pub discount_total: i64,
    pub total: i64,
}

pub fn customer_confirmation(order: &OrderEmail) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<html><body style=\"font-family:sans-serif;color:#222\">\
         <h1>Thank you for your order, {name}!</h1>\
         <p>We received order <strong>{number}</strong>. \
         We will contact you shortly to arrange payment and delivery.</p>",
        name = escape(&order.customer_name),
        number = escape(&order.order_number),
    );
    push_items(&mut html, order);
    push_address(&mut html, order);
    let _ = write!(
        html,
        "<p>{site}</p></body></html>",
        site = escape(&order.site_name)
    );
    html
}

pub fn admin_notification(order: &OrderEmail) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<html><body style=\"font-family:sans-serif;color:#222\">\
         <h1>New order {number}</h1>\
         <table>\
         <tr><td>Customer</td><td>{name}</td></tr>\
         <tr><td>Email</td><td>{email}</td></tr>\
         <tr><td>Phone</td><td>{phone}</td></tr>\
         </table>",
        number = escape(&order.order_number),
        name = escape(&order.customer_name),
        email = escape(&order.customer_email),
        phone = escape(order.phone.as_deref().unwrap_or("-")),
    );
    if let Some(note) = order.note.as_deref().filter(|n| !n.trim().is_empty()) {
        let _ = write!(html, "<h3>Note</h3><p>{}</p>", escape(note));
    }
    push_items(&mut html, order);
    push_address(&mut html, order);
    html.push_str("</body></html>");
    html
}

fn push_items(html: &mut String, order: &OrderEmail) {
    html.push_str(
        "<table style=\"border-collapse:collapse;width:100%\">\
         <tr><th align=\"left\">Item</th><th>Qty</th><th align=\"right\">Price</th>\
         <th align=\"right\">Total</th></tr>",
    );
    for line in &order.lines {
        let attrs = line
            .attributes
            .iter()
            .map(|a| format!("{}: {}", escape(&a.key), escape(&a.value)))
            .collect::<Vec<_>>()
            .join(", ");
        let discount = match line.discount {
            Some(d) if d > 0 => format!(" (-{d}%)"),
            _ => String::new(),
        };
        let _ = write!(
            html,
            "<tr><td>{name}<br><small>{attrs}</small></td><td align=\"center\">{qty}</td>\
             <td align=\"right\">{price}{discount}</td><td align=\"right\">{total}</td></tr>",
            name = escape(&line.name),
            qty = line.quantity,
            price = format_price(line.unit_price, &order.currency),
            total = format_price(line.line_total, &order.currency),
        );
    }
    let _ = write!(
        html,
        "</table><p>Subtotal: {sub}<br>Discount: {disc}<br><strong>Total: {total}</strong></p>",
        sub = format_price(order.subtotal, &order.currency),
        disc = format_price(order.discount_total, &order.currency),
        total = format_price(order.total, &order.currency),
    );
}

fn push_address(html: &mut String, order: &OrderEmail) {
    if order.shipping_address.is_empty() {
        return;
    }
    html.push_str("<h3>Shipping address</h3><p>");
    let lines: Vec<String> = order.shipping_address.iter().map(|l| escape(l)).collect();
    html.push_str(&lines.join("<br>"));
    html.push_str("</p>");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Address, Order, OrderItem};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddressInput {
    pub name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub shipping_address: AddressInput,
    pub billing_address: Option<AddressInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLookupQuery {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub addresses: Vec<Address>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

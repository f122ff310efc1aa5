use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest, UpdatePaymentStatusRequest},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::order_service::load_order_with_items,
    state::AppState,
};

pub const ORDER_STATUSES: [&str; 5] = ["pending", "confirmed", "shipped", "completed", "cancelled"];
pub const PAYMENT_STATUSES: [&str; 2] = ["unpaid", "paid"];

pub async fn list_all_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items: orders }, Some(meta)))
}

pub async fn get_order_admin(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = load_order_with_items(&state.orm, order).await?;
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    validate_status(&payload.status, &ORDER_STATUSES, "order status")?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        Order::from(order),
        Some(Meta::empty()),
    ))
}

/// Payment happens outside the shop; the dashboard records it by hand.
pub async fn update_payment_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    validate_status(&payload.payment_status, &PAYMENT_STATUSES, "payment status")?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if existing.payment_status == payload.payment_status {
        return Err(AppError::BadRequest(format!(
            "Order is already {}",
            payload.payment_status
        )));
    }

    let mut active: OrderActive = existing.into();
    active.payment_status = Set(payload.payment_status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "order_payment_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "payment_status": order.payment_status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment status updated",
        Order::from(order),
        Some(Meta::empty()),
    ))
}

fn validate_status(value: &str, allowed: &[&str], what: &str) -> Result<(), AppError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid {what}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_statuses_pass() {
        assert!(validate_status("shipped", &ORDER_STATUSES, "order status").is_ok());
        assert!(validate_status("paid", &PAYMENT_STATUSES, "payment status").is_ok());
        let err = validate_status("lost", &ORDER_STATUSES, "order status").unwrap_err();
        assert_eq!(err.to_string(), "Bad Request Invalid order status");
    }
}

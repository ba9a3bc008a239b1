//! Order Endpoints
//! Mission: Customers place orders, restaurants move them through their lifecycle

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    access::{authorize, owned_by, Operation},
    auth::models::{Role, User, UserSummary},
    error::ApiError,
    models::{MenuItemSummary, NewOrder, Order, OrderStatus, OrderView, StatusUpdate},
    response::{created, Envelope},
    state::AppState,
    validation::{self, ORDER_RULES, ORDER_STATUS_RULES},
};

/// List orders - GET /api/v1/orders
///
/// Restaurants see orders placed with them, customers see their own.
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Envelope<Vec<OrderView>>>, ApiError> {
    authorize(Operation::ListOrders, &user)?;

    let orders = match user.role() {
        Role::Restaurant => state.orders.list_for_restaurant(&user.id)?,
        Role::Customer => state.orders.list_for_customer(&user.id)?,
    };

    let views = orders
        .into_iter()
        .map(|order| expand_order(&state, order))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(Envelope::list(views)))
}

/// Create order - POST /api/v1/orders/:restaurantId
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(restaurant_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<OrderView>>), ApiError> {
    authorize(Operation::CreateOrder, &user)?;

    let Json(body) = payload?;
    let new_order: NewOrder = validation::parse(body, ORDER_RULES)?;

    let no_restaurant =
        || ApiError::NotFound(format!("No restaurant found with id {}", restaurant_id));
    let restaurant_uuid = Uuid::parse_str(&restaurant_id).map_err(|_| no_restaurant())?;
    let restaurant = state
        .users
        .get_user_by_id(&restaurant_uuid)?
        .ok_or_else(no_restaurant)?;

    if !restaurant.is_restaurant {
        return Err(ApiError::Validation(format!(
            "User {} is not a restaurant",
            restaurant_id
        )));
    }

    let not_offered = |item: &str| {
        ApiError::Validation(format!(
            "Menu item {} is not offered by restaurant {}",
            item, restaurant.id
        ))
    };

    let item_ids = new_order
        .item_list
        .iter()
        .map(|raw| Uuid::parse_str(raw).map_err(|_| not_offered(raw.as_str())))
        .collect::<Result<Vec<_>, _>>()?;

    let offered = state.menu_items.get_many(&item_ids)?;
    for id in &item_ids {
        if !offered
            .iter()
            .any(|item| item.id == *id && item.user == restaurant.id)
        {
            return Err(not_offered(&id.to_string()));
        }
    }

    let order = state
        .orders
        .create(&restaurant.id, &user.id, item_ids, new_order.total_price)?;

    Ok(created(expand_order(&state, order)?))
}

/// Update order status - PUT /api/v1/orders/:orderId
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(order_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<OrderView>>, ApiError> {
    authorize(Operation::UpdateOrderStatus, &user)?;

    let Json(body) = payload?;
    let update: StatusUpdate = validation::parse(body, ORDER_STATUS_RULES)?;
    let status = OrderStatus::parse(update.status.trim()).ok_or_else(|| {
        ApiError::Validation(format!("Invalid order status {}", update.status))
    })?;

    let not_found = || format!("No order found with id {}", order_id);

    let existing = match Uuid::parse_str(&order_id) {
        Ok(id) => state.orders.get(&id)?,
        Err(_) => None,
    };
    let order = owned_by(existing, |order: &Order| order.restaurant, &user, not_found)?;

    let updated = state
        .orders
        .update_status(&order.id, status)?
        .ok_or_else(|| ApiError::NotFound(not_found()))?;

    info!(
        "🍽️  {} moved order {} to {}",
        user.user_email,
        updated.id,
        status.as_str()
    );

    Ok(Json(Envelope::data(expand_order(&state, updated)?)))
}

/// Replace an order's references with their whitelisted projections.
///
/// Actors that no longer exist become `null`; vanished menu items are left out.
pub fn expand_order(state: &AppState, order: Order) -> Result<OrderView, ApiError> {
    let restaurant = state
        .users
        .get_user_by_id(&order.restaurant)?
        .as_ref()
        .map(UserSummary::from_user);
    let user = state
        .users
        .get_user_by_id(&order.user)?
        .as_ref()
        .map(UserSummary::from_user);
    let item_list = state
        .menu_items
        .get_many(&order.item_list)?
        .iter()
        .map(MenuItemSummary::from_item)
        .collect();

    Ok(OrderView {
        id: order.id,
        status: order.status,
        total_price: order.total_price,
        restaurant,
        user,
        item_list,
        created_at: order.created_at,
        updated_at: order.updated_at,
    })
}

//! Menu Item Endpoints
//! Mission: Restaurants curate their menus, everyone can browse them

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    access::{authorize, owned_by, Operation},
    auth::models::{Role, User},
    error::ApiError,
    models::{MenuItem, NewMenuItem},
    response::{created, Envelope},
    state::AppState,
    validation::{self, MENU_ITEM_RULES},
};

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub restaurant: Option<String>,
}

/// List menu items - GET /api/v1/menuitems
///
/// `?restaurant=<id>` narrows to one restaurant. Without it a restaurant sees its own
/// menu and a customer sees every item.
pub async fn list_menu_items(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Envelope<Vec<MenuItem>>>, ApiError> {
    let items = match query.restaurant.as_deref() {
        // A malformed id cannot own anything
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(owner) => state.menu_items.list_by_owner(&owner)?,
            Err(_) => Vec::new(),
        },
        None => match user.role() {
            Role::Restaurant => state.menu_items.list_by_owner(&user.id)?,
            Role::Customer => state.menu_items.list_all()?,
        },
    };

    Ok(Json(Envelope::list(items)))
}

/// Add menu item - POST /api/v1/menuitems
pub async fn add_menu_item(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<MenuItem>>), ApiError> {
    authorize(Operation::AddMenuItem, &user)?;

    let Json(body) = payload?;
    let new_item: NewMenuItem = validation::parse(body, MENU_ITEM_RULES)?;

    let item = state.menu_items.create(&user.id, &new_item)?;

    Ok(created(item))
}

/// Delete menu item - DELETE /api/v1/menuitems/:id
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<Value>>, ApiError> {
    authorize(Operation::DeleteMenuItem, &user)?;

    let not_found = || format!("No menu item found with id {}", raw_id);

    let existing = match Uuid::parse_str(&raw_id) {
        Ok(id) => state.menu_items.get(&id)?,
        Err(_) => None,
    };
    let item = owned_by(existing, |item: &MenuItem| item.user, &user, not_found)?;

    if !state.menu_items.delete(&item.id)? {
        return Err(ApiError::NotFound(not_found()));
    }

    Ok(Json(Envelope::data(json!({}))))
}

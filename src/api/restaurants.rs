//! Restaurant directory

use axum::{extract::State, Json};

use crate::{auth::models::User, error::ApiError, response::Envelope, state::AppState};

/// List restaurants - GET /api/v1/restaurants
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<User>>>, ApiError> {
    let restaurants = state.users.list_restaurants()?;
    Ok(Json(Envelope::list(restaurants)))
}

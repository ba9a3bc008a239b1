//! HTTP API
//! Mission: Wire every endpoint under `/api/v1` with the auth guard where it belongs

pub mod images;
pub mod menu_items;
pub mod orders;
pub mod restaurants;

use std::any::Any;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::{
    auth::{api as auth_api, auth_middleware},
    middleware::{make_request_span, request_logging},
    state::AppState,
};

pub const API_PREFIX: &str = "/api/v1";

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route(&path("/auth/register"), post(auth_api::register))
        .route(&path("/auth/login"), post(auth_api::login))
        .route(&path("/auth/forgotpassword"), post(auth_api::forgot_password))
        .route(
            &path("/auth/resetpassword/:token"),
            put(auth_api::reset_password),
        )
        .route(&path("/restaurants"), get(restaurants::list_restaurants))
        .with_state(state.clone());

    // Protected routes
    let protected_routes = Router::new()
        .route(&path("/auth/me"), get(auth_api::get_me))
        .route(&path("/auth/logout"), get(auth_api::logout))
        .route(
            &path("/auth/changepassword"),
            put(auth_api::change_password),
        )
        .route(&path("/auth/update"), put(auth_api::update_details))
        .route(
            &path("/menuitems"),
            get(menu_items::list_menu_items).post(menu_items::add_menu_item),
        )
        .route(
            &path("/menuitems/:id"),
            delete(menu_items::delete_menu_item),
        )
        .route(&path("/orders"), get(orders::list_orders))
        .route(
            &path("/orders/:id"),
            post(orders::create_order).put(orders::update_order_status),
        )
        .route(&path("/images"), post(images::upload_image))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
}

fn path(route: &str) -> String {
    format!("{}{}", API_PREFIX, route)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Resource not found" })),
    )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("💥 Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        json!({ "success": false, "error": "Server Error" }).to_string(),
    )
        .into_response()
}

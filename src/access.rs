//! Authorization Rules
//! Mission: Role and ownership preconditions per resource operation
//!
//! Role checks run first and fail with `Forbidden` (401). Ownership failures are reported
//! exactly like a missing resource (404), so callers cannot discover ids they do not own.

use tracing::warn;
use uuid::Uuid;

use crate::auth::models::{Role, User};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddMenuItem,
    DeleteMenuItem,
    CreateOrder,
    ListOrders,
    UpdateOrderStatus,
}

impl Operation {
    /// Role the caller must hold; `None` means any actor
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Operation::AddMenuItem | Operation::DeleteMenuItem | Operation::UpdateOrderStatus => {
                Some(Role::Restaurant)
            }
            Operation::CreateOrder => Some(Role::Customer),
            Operation::ListOrders => None,
        }
    }

    fn denial(&self) -> &'static str {
        match self {
            Operation::AddMenuItem => "User not authorized to add a menu item",
            Operation::DeleteMenuItem => "User not authorized to delete a menu item",
            Operation::CreateOrder => "User not authorized to place an order",
            Operation::ListOrders => "User not authorized to list orders",
            Operation::UpdateOrderStatus => "User not authorized to update orders",
        }
    }
}

/// Role precondition for `op`
pub fn authorize(op: Operation, actor: &User) -> Result<(), ApiError> {
    match op.required_role() {
        Some(role) if role != actor.role() => {
            warn!(
                actor = %actor.id,
                role = actor.role().as_str(),
                operation = ?op,
                "Role check failed"
            );
            Err(ApiError::Forbidden(op.denial().to_string()))
        }
        _ => Ok(()),
    }
}

/// Ownership precondition: yields the resource only when `owner_of` names the caller.
///
/// An absent resource and a resource owned by someone else produce the same
/// `NotFound` error.
pub fn owned_by<T>(
    resource: Option<T>,
    owner_of: impl Fn(&T) -> Uuid,
    actor: &User,
    not_found: impl FnOnce() -> String,
) -> Result<T, ApiError> {
    match resource {
        Some(r) if owner_of(&r) == actor.id => Ok(r),
        Some(_) => {
            warn!(actor = %actor.id, "Ownership check failed");
            Err(ApiError::NotFound(not_found()))
        }
        None => Err(ApiError::NotFound(not_found())),
    }
}

//! Field rule tables evaluated against raw JSON bodies before anything is persisted.
//!
//! Every failing rule contributes its message; messages are joined with `,`.
//! Once a field has failed, later rules for the same field are skipped.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
pub enum Check {
    /// Present, not null, and not an empty/blank string
    Required,
    /// String with at least N characters
    MinLength(usize),
    /// Non-blank string
    NonBlank,
    Email,
    /// Number strictly greater than zero
    Positive,
    /// Non-negative whole number
    Count,
    Boolean,
    /// Array of strings
    StringList,
    /// Array of strings with at least one entry
    NonEmptyStringList,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

const fn rule(field: &'static str, check: Check, message: &'static str) -> FieldRule {
    FieldRule {
        field,
        check,
        message,
    }
}

pub const USER_RULES: &[FieldRule] = &[
    rule("userName", Check::Required, "Please add a name"),
    rule("userEmail", Check::Required, "Please enter an email"),
    rule("userEmail", Check::Email, "Please add a valid email"),
    rule("userPassword", Check::Required, "Please enter a password"),
    rule(
        "userPassword",
        Check::MinLength(6),
        "Password must be at least 6 characters",
    ),
    rule(
        "isRestaurant",
        Check::Boolean,
        "isRestaurant must be true or false",
    ),
    rule("userAge", Check::Count, "userAge must be a whole number"),
    rule(
        "typeOfFood",
        Check::StringList,
        "typeOfFood must be a list of strings",
    ),
];

pub const PROFILE_UPDATE_RULES: &[FieldRule] = &[
    rule("userName", Check::NonBlank, "Please add a name"),
    rule("userEmail", Check::Email, "Please add a valid email"),
];

pub const RESET_PASSWORD_RULES: &[FieldRule] = &[
    rule("password", Check::Required, "Please enter a password"),
    rule(
        "password",
        Check::MinLength(6),
        "Password must be at least 6 characters",
    ),
];

pub const CHANGE_PASSWORD_RULES: &[FieldRule] = &[
    rule(
        "currentPassword",
        Check::Required,
        "Please provide your current password",
    ),
    rule("newPassword", Check::Required, "Please provide a new password"),
    rule(
        "newPassword",
        Check::MinLength(6),
        "Password must be at least 6 characters",
    ),
];

pub const MENU_ITEM_RULES: &[FieldRule] = &[
    rule("chooseItemType", Check::Required, "Please select an item type"),
    rule("itemImageUrl", Check::Required, "Please select an item image"),
    rule("itemIngredients", Check::Required, "Please add item ingredients"),
    rule("itemPrice", Check::Required, "Please add item price"),
    rule(
        "itemPrice",
        Check::Positive,
        "Item price must be greater than zero",
    ),
    rule("itemTitle", Check::Required, "Please add item title"),
];

pub const ORDER_RULES: &[FieldRule] = &[
    rule("totalPrice", Check::Required, "Please add the order total"),
    rule(
        "totalPrice",
        Check::Positive,
        "Order total must be greater than zero",
    ),
    rule(
        "itemList",
        Check::NonEmptyStringList,
        "Please add at least one menu item",
    ),
];

pub const ORDER_STATUS_RULES: &[FieldRule] = &[rule(
    "status",
    Check::Required,
    "Please send the updated status",
)];

/// Evaluate `rules` against `body`
pub fn validate(body: &Value, rules: &[FieldRule]) -> Result<(), ApiError> {
    let mut failed: Vec<&str> = Vec::new();
    let mut messages: Vec<&str> = Vec::new();

    for r in rules {
        if failed.contains(&r.field) {
            continue;
        }
        if !passes(body.get(r.field), r.check) {
            failed.push(r.field);
            messages.push(r.message);
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(messages.join(",")))
    }
}

/// Validate, then deserialize into the typed request
pub fn parse<T: DeserializeOwned>(body: Value, rules: &[FieldRule]) -> Result<T, ApiError> {
    validate(&body, rules)?;
    serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))
}

fn passes(value: Option<&Value>, check: Check) -> bool {
    // Only Required and NonEmptyStringList care about absence
    let value = match (value, check) {
        (None | Some(Value::Null), Check::Required | Check::NonEmptyStringList) => return false,
        (None | Some(Value::Null), _) => return true,
        (Some(v), _) => v,
    };

    match check {
        Check::Required => match value {
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        },
        Check::MinLength(n) => value.as_str().is_some_and(|s| s.chars().count() >= n),
        Check::NonBlank => value.as_str().is_some_and(|s| !s.trim().is_empty()),
        Check::Email => value.as_str().is_some_and(is_email),
        Check::Positive => value.as_f64().is_some_and(|n| n > 0.0),
        Check::Count => value.as_u64().is_some(),
        Check::Boolean => value.is_boolean(),
        Check::StringList => is_string_list(value),
        Check::NonEmptyStringList => {
            is_string_list(value) && value.as_array().is_some_and(|a| !a.is_empty())
        }
    }
}

fn is_string_list(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_string))
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

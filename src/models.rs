use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::models::UserSummary;

/// A dish offered by exactly one restaurant actor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub choose_item_type: String,
    pub item_image_url: String,
    pub item_ingredients: String,
    pub item_price: f64,
    pub item_title: String,
    /// Owning restaurant
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Menu item fields embedded in an expanded order
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemSummary {
    pub id: Uuid,
    pub item_title: String,
    pub item_price: f64,
    pub choose_item_type: String,
    pub item_image_url: String,
}

impl MenuItemSummary {
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            item_title: item.item_title.clone(),
            item_price: item.item_price,
            choose_item_type: item.choose_item_type.clone(),
            item_image_url: item.item_image_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    pub choose_item_type: String,
    pub item_image_url: String,
    pub item_ingredients: String,
    pub item_price: f64,
    pub item_title: String,
}

/// Order lifecycle
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "IN_PROGRESS", alias = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "DELIVERED")]
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Delivered => "DELIVERED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "IN_PROGRESS" | "IN PROGRESS" => Some(OrderStatus::InProgress),
            "DELIVERED" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }
}

/// Stored order: references only
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub status: OrderStatus,
    pub total_price: f64,
    pub restaurant: Uuid,
    pub user: Uuid,
    pub item_list: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order with its references expanded through the field whitelists
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Uuid,
    pub status: OrderStatus,
    pub total_price: f64,
    pub restaurant: Option<UserSummary>,
    pub user: Option<UserSummary>,
    pub item_list: Vec<MenuItemSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub total_price: f64,
    pub item_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, r#""IN_PROGRESS""#);

        let status: OrderStatus = serde_json::from_str(r#""IN PROGRESS""#).unwrap();
        assert_eq!(status, OrderStatus::InProgress);

        assert!(serde_json::from_str::<OrderStatus>(r#""COOKING""#).is_err());
    }

    #[test]
    fn test_order_status_string_conversion() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Delivered,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("pending"), None);
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_menu_item_summary_whitelist() {
        let item = MenuItem {
            id: Uuid::new_v4(),
            choose_item_type: "Veg".to_string(),
            item_image_url: "https://img/1.png".to_string(),
            item_ingredients: "secret spice blend".to_string(),
            item_price: 12.5,
            item_title: "Paneer Tikka".to_string(),
            user: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(MenuItemSummary::from_item(&item)).unwrap();
        assert_eq!(json["itemTitle"], "Paneer Tikka");
        assert_eq!(json["itemPrice"], 12.5);
        assert!(json.get("itemIngredients").is_none());
        assert!(json.get("user").is_none());
    }
}

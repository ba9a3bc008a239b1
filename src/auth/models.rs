//! Authentication Models
//! Mission: Define actor accounts and the auth request/response shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered actor: a customer or a restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub user_email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub is_restaurant: bool,
    pub user_gender: Option<String>,
    pub user_age: Option<u32>,
    pub user_city: Option<String>,
    pub user_country: Option<String>,
    pub user_profile_image_url: Option<String>,
    pub type_of_food: Vec<String>,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>, // sha256 digest, never the raw token
    #[serde(skip_serializing)]
    pub reset_password_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        if self.is_restaurant {
            Role::Restaurant
        } else {
            Role::Customer
        }
    }
}

/// Actor role, derived from the `isRestaurant` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Restaurant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Restaurant => "restaurant",
        }
    }
}

/// Actor fields embedded when an order is expanded.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_city: Option<String>,
    pub user_country: Option<String>,
    pub user_profile_image_url: Option<String>,
}

impl UserSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.clone(),
            user_email: user.user_email.clone(),
            user_city: user.user_city.clone(),
            user_country: user.user_country.clone(),
            user_profile_image_url: user.user_profile_image_url.clone(),
        }
    }
}

/// Register request body (validated by `validation::USER_RULES` first)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub user_email: String,
    pub user_password: String,
    #[serde(default)]
    pub is_restaurant: bool,
    pub user_gender: Option<String>,
    pub user_age: Option<u32>,
    pub user_city: Option<String>,
    pub user_country: Option<String>,
    pub user_profile_image_url: Option<String>,
    #[serde(default)]
    pub type_of_food: Vec<String>,
}

/// Login request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_email: Option<String>,
    pub user_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Profile update; every field optional, at least one required
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsRequest {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_city: Option<String>,
    pub user_country: Option<String>,
    pub user_profile_image_url: Option<String>,
}

impl UpdateDetailsRequest {
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none()
            && self.user_email.is_none()
            && self.user_city.is_none()
            && self.user_country.is_none()
            && self.user_profile_image_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            user_name: "Biryani Zone".to_string(),
            user_email: "biryani.zone@gmail.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            is_restaurant: true,
            user_gender: None,
            user_age: None,
            user_city: Some("Bangalore".to_string()),
            user_country: Some("India".to_string()),
            user_profile_image_url: None,
            type_of_food: vec!["Biryani".to_string()],
            reset_password_token: Some("digest".to_string()),
            reset_password_expire: Some(Utc::now()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_serialization_hides_secrets() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert_eq!(json["userEmail"], "biryani.zone@gmail.com");
        assert_eq!(json["isRestaurant"], true);
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("resetPasswordToken").is_none());
        assert!(json.get("resetPasswordExpire").is_none());
        assert!(!json.to_string().contains("$2b$04$secret"));
    }

    #[test]
    fn test_role_from_flag() {
        let mut user = sample_user();
        assert_eq!(user.role(), Role::Restaurant);
        user.is_restaurant = false;
        assert_eq!(user.role(), Role::Customer);
        assert_eq!(Role::Customer.as_str(), "customer");
    }

    #[test]
    fn test_summary_whitelist() {
        let json = serde_json::to_value(UserSummary::from_user(&sample_user())).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        assert!(keys.contains(&"userName"));
        assert!(!keys.contains(&"isRestaurant"));
        assert!(!keys.contains(&"typeOfFood"));
    }

    #[test]
    fn test_update_request_emptiness() {
        assert!(UpdateDetailsRequest::default().is_empty());
        let req: UpdateDetailsRequest =
            serde_json::from_str(r#"{"userCity":"Pune"}"#).unwrap();
        assert!(!req.is_empty());
    }
}

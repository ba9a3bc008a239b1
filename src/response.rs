//! Uniform JSON envelope: `{ success, data?, count?, token? }`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

use crate::config::Config;

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            token: None,
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            data: Some(items),
            token: None,
        }
    }
}

/// `201 Created` with a data envelope
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::data(data)))
}

/// Token envelope plus the `token` cookie
#[derive(Debug)]
pub struct TokenResponse {
    pub token: String,
    cookie: Cookie<'static>,
}

impl TokenResponse {
    pub fn new(token: String, config: &Config) -> Self {
        let max_age = config.jwt_cookie_expire_days * 24 * 60 * 60;
        let cookie = token_cookie(token.clone(), max_age, config.production);
        Self { token, cookie }
    }
}

impl IntoResponse for TokenResponse {
    fn into_response(self) -> Response {
        let body = Envelope::<()> {
            success: true,
            data: None,
            count: None,
            token: Some(self.token),
        };
        (StatusCode::OK, CookieJar::new().add(self.cookie), Json(body)).into_response()
    }
}

/// Cookie that overwrites the token with `none` for ten seconds
pub fn logout_cookie(config: &Config) -> Cookie<'static> {
    token_cookie("none".to_string(), 10, config.production)
}

fn token_cookie(value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::header};
    use serde_json::json;

    #[test]
    fn test_envelope_skips_absent_fields() {
        let json = serde_json::to_value(Envelope::data(json!({}))).unwrap();
        assert_eq!(json, json!({ "success": true, "data": {} }));

        let json = serde_json::to_value(Envelope::list(vec![1, 2, 3])).unwrap();
        assert_eq!(json, json!({ "success": true, "count": 3, "data": [1, 2, 3] }));
    }

    #[tokio::test]
    async fn test_token_response_sets_cookie() {
        let mut config = Config::for_tests();
        config.production = true;
        config.jwt_cookie_expire_days = 1;

        let response = TokenResponse::new("abc.def.ghi".to_string(), &config).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("token=abc.def.ghi;"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "success": true, "token": "abc.def.ghi" }));
    }

    #[test]
    fn test_logout_cookie() {
        let cookie = logout_cookie(&Config::for_tests()).to_string();
        assert!(cookie.starts_with("token=none;"));
        assert!(cookie.contains("Max-Age=10"));
        assert!(!cookie.contains("Secure"));
    }
}

//! User Storage
//! Mission: Persist actors; hash credentials exactly when they are set or changed

use crate::auth::models::{RegisterRequest, UpdateDetailsRequest, User};
use crate::auth::password::PasswordHasher;
use crate::store::{list_column, parse_time, time_column, uuid_column, Database};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, user_name, user_email, password_hash, is_restaurant, user_gender,
     user_age, user_city, user_country, user_profile_image_url, type_of_food,
     reset_password_token, reset_password_expire, created_at";

/// Actor storage on the shared document store
#[derive(Clone)]
pub struct UserStore {
    db: Database,
    hasher: PasswordHasher,
}

impl UserStore {
    pub fn new(db: Database, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Create a new actor. The password is hashed here, never stored raw.
    pub fn create_user(&self, req: &RegisterRequest) -> Result<User> {
        let password_hash = self.hasher.hash(&req.user_password)?;
        let now = Utc::now();

        let user = User {
            id: Uuid::new_v4(),
            user_name: req.user_name.trim().to_string(),
            user_email: normalize_email(&req.user_email),
            password_hash,
            is_restaurant: req.is_restaurant,
            user_gender: req.user_gender.clone(),
            user_age: req.user_age,
            user_city: req.user_city.clone(),
            user_country: req.user_country.clone(),
            user_profile_image_url: req.user_profile_image_url.clone(),
            type_of_food: req.type_of_food.clone(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: now,
        };

        let type_of_food = serde_json::to_string(&user.type_of_food)?;

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, user_name, user_email, password_hash, is_restaurant,
                     user_gender, user_age, user_city, user_country, user_profile_image_url,
                     type_of_food, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
                params![
                    user.id.to_string(),
                    user.user_name,
                    user.user_email,
                    user.password_hash,
                    user.is_restaurant,
                    user.user_gender,
                    user.user_age,
                    user.user_city,
                    user.user_country,
                    user.user_profile_image_url,
                    type_of_food,
                    now.to_rfc3339(),
                ],
            )
            .context("Failed to insert user")?;
            Ok(())
        })?;

        info!(
            "✅ Registered {}: {} ({})",
            user.role().as_str(),
            user.user_email,
            user.id
        );

        Ok(user)
    }

    pub fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        self.query_one(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            &id.to_string(),
        )
    }

    /// Look up by email (case-insensitive), credential digest included
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_one(
            &format!("SELECT {} FROM users WHERE user_email = ?1", USER_COLUMNS),
            &normalize_email(email),
        )
    }

    /// Verify email + password; `None` for unknown email and wrong password alike
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        Ok(self
            .get_user_by_email(email)?
            .filter(|user| self.hasher.verify(password, &user.password_hash)))
    }

    /// Replace the credential (re-hashes) and consume any pending reset token
    pub fn set_password(&self, id: &Uuid, new_password: &str) -> Result<()> {
        let password_hash = self.hasher.hash(new_password)?;

        self.db.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET password_hash = ?2, reset_password_token = NULL,
                     reset_password_expire = NULL, updated_at = ?3
                 WHERE id = ?1",
                params![id.to_string(), password_hash, Utc::now().to_rfc3339()],
            )
            .context("Failed to update password")?;
            Ok(())
        })?;

        info!("🔑 Password changed for {}", id);
        Ok(())
    }

    /// Apply a profile update. The credential is left untouched.
    pub fn update_details(&self, id: &Uuid, changes: &UpdateDetailsRequest) -> Result<Option<User>> {
        let email = changes.user_email.as_deref().map(normalize_email);
        let name = changes.user_name.as_deref().map(str::trim);

        let updated = self.db.with_conn(|conn| {
            let rows = conn
                .execute(
                    "UPDATE users SET
                         user_name = COALESCE(?2, user_name),
                         user_email = COALESCE(?3, user_email),
                         user_city = COALESCE(?4, user_city),
                         user_country = COALESCE(?5, user_country),
                         user_profile_image_url = COALESCE(?6, user_profile_image_url),
                         updated_at = ?7
                     WHERE id = ?1",
                    params![
                        id.to_string(),
                        name,
                        email,
                        changes.user_city,
                        changes.user_country,
                        changes.user_profile_image_url,
                        Utc::now().to_rfc3339(),
                    ],
                )
                .context("Failed to update user details")?;
            Ok(rows)
        })?;

        if updated == 0 {
            return Ok(None);
        }
        self.get_user_by_id(id)
    }

    pub fn set_reset_token(&self, id: &Uuid, digest: &str, expires_at: DateTime<Utc>) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET reset_password_token = ?2, reset_password_expire = ?3
                 WHERE id = ?1",
                params![id.to_string(), digest, expires_at.to_rfc3339()],
            )
            .context("Failed to store reset token")?;
            Ok(())
        })
    }

    pub fn clear_reset_token(&self, id: &Uuid) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET reset_password_token = NULL, reset_password_expire = NULL
                 WHERE id = ?1",
                params![id.to_string()],
            )
            .context("Failed to clear reset token")?;
            Ok(())
        })
    }

    /// Find the actor holding an unexpired reset token with this digest
    pub fn find_by_reset_digest(&self, digest: &str) -> Result<Option<User>> {
        let user = self.query_one(
            &format!(
                "SELECT {} FROM users WHERE reset_password_token = ?1",
                USER_COLUMNS
            ),
            digest,
        )?;

        Ok(user.filter(|u| {
            u.reset_password_expire
                .is_some_and(|expires| expires > Utc::now())
        }))
    }

    pub fn list_restaurants(&self) -> Result<Vec<User>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM users WHERE is_restaurant = 1 ORDER BY created_at",
                USER_COLUMNS
            ))?;
            let users = stmt
                .query_map([], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(users)
        })
    }

    fn query_one(&self, sql: &str, key: &str) -> Result<Option<User>> {
        self.db.with_conn(|conn| {
            let user = conn
                .query_row(sql, params![key], row_to_user)
                .optional()?;
            Ok(user)
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let reset_expire: Option<String> = row.get(12)?;
    Ok(User {
        id: uuid_column(row, 0)?,
        user_name: row.get(1)?,
        user_email: row.get(2)?,
        password_hash: row.get(3)?,
        is_restaurant: row.get(4)?,
        user_gender: row.get(5)?,
        user_age: row.get(6)?,
        user_city: row.get(7)?,
        user_country: row.get(8)?,
        user_profile_image_url: row.get(9)?,
        type_of_food: list_column(row, 10)?,
        reset_password_token: row.get(11)?,
        reset_password_expire: reset_expire.and_then(|raw| parse_time(&raw).ok()),
        created_at: time_column(row, 13)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::is_unique_violation;
    use chrono::Duration;

    fn create_test_store() -> UserStore {
        let db = Database::open(":memory:").unwrap();
        UserStore::new(db, PasswordHasher::new(4))
    }

    fn register(name: &str, email: &str, password: &str, is_restaurant: bool) -> RegisterRequest {
        RegisterRequest {
            user_name: name.to_string(),
            user_email: email.to_string(),
            user_password: password.to_string(),
            is_restaurant,
            user_gender: None,
            user_age: Some(22),
            user_city: Some("Bangalore".to_string()),
            user_country: Some("India".to_string()),
            user_profile_image_url: None,
            type_of_food: vec![],
        }
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let store = create_test_store();
        let user = store
            .create_user(&register("John", "John@Gmail.com", "123456", false))
            .unwrap();

        assert_eq!(user.user_email, "john@gmail.com");
        assert_ne!(user.password_hash, "123456");

        let by_id = store.get_user_by_id(&user.id).unwrap().unwrap();
        assert_eq!(by_id.user_email, "john@gmail.com");
        assert_eq!(by_id.user_age, Some(22));
        assert!(!by_id.is_restaurant);

        let by_email = store.get_user_by_email(" JOHN@gmail.com ").unwrap();
        assert_eq!(by_email.unwrap().id, user.id);
    }

    #[test]
    fn test_same_password_different_digests() {
        let store = create_test_store();
        let a = store
            .create_user(&register("A", "a@x.io", "samepass", false))
            .unwrap();
        let b = store
            .create_user(&register("B", "b@x.io", "samepass", false))
            .unwrap();
        assert_ne!(a.password_hash, b.password_hash);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = create_test_store();
        store
            .create_user(&register("A", "dup@x.io", "123456", false))
            .unwrap();
        let err = store
            .create_user(&register("B", "DUP@x.io", "123456", true))
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn test_verify_credentials() {
        let store = create_test_store();
        store
            .create_user(&register("A", "a@x.io", "123456", false))
            .unwrap();

        assert!(store.verify_credentials("a@x.io", "123456").unwrap().is_some());
        assert!(store.verify_credentials("a@x.io", "wrong").unwrap().is_none());
        assert!(store.verify_credentials("nobody@x.io", "123456").unwrap().is_none());
    }

    #[test]
    fn test_update_details_keeps_credential() {
        let store = create_test_store();
        let user = store
            .create_user(&register("A", "a@x.io", "123456", false))
            .unwrap();

        let changes = UpdateDetailsRequest {
            user_city: Some("Pune".to_string()),
            ..Default::default()
        };
        let updated = store.update_details(&user.id, &changes).unwrap().unwrap();

        assert_eq!(updated.user_city.as_deref(), Some("Pune"));
        assert_eq!(updated.user_name, "A");
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[test]
    fn test_update_details_unknown_user() {
        let store = create_test_store();
        let changes = UpdateDetailsRequest {
            user_name: Some("X".to_string()),
            ..Default::default()
        };
        assert!(store
            .update_details(&Uuid::new_v4(), &changes)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_set_password_rehashes_and_clears_reset() {
        let store = create_test_store();
        let user = store
            .create_user(&register("A", "a@x.io", "123456", false))
            .unwrap();
        store
            .set_reset_token(&user.id, "digest", Utc::now() + Duration::minutes(10))
            .unwrap();

        store.set_password(&user.id, "654321").unwrap();

        let reloaded = store.get_user_by_id(&user.id).unwrap().unwrap();
        assert_ne!(reloaded.password_hash, user.password_hash);
        assert!(reloaded.reset_password_token.is_none());
        assert!(store.verify_credentials("a@x.io", "654321").unwrap().is_some());
        assert!(store.verify_credentials("a@x.io", "123456").unwrap().is_none());
    }

    #[test]
    fn test_reset_digest_lookup_respects_expiry() {
        let store = create_test_store();
        let user = store
            .create_user(&register("A", "a@x.io", "123456", false))
            .unwrap();

        store
            .set_reset_token(&user.id, "fresh", Utc::now() + Duration::minutes(10))
            .unwrap();
        assert_eq!(
            store.find_by_reset_digest("fresh").unwrap().unwrap().id,
            user.id
        );
        assert!(store.find_by_reset_digest("other").unwrap().is_none());

        store
            .set_reset_token(&user.id, "stale", Utc::now() - Duration::minutes(1))
            .unwrap();
        assert!(store.find_by_reset_digest("stale").unwrap().is_none());

        store.clear_reset_token(&user.id).unwrap();
        let reloaded = store.get_user_by_id(&user.id).unwrap().unwrap();
        assert!(reloaded.reset_password_expire.is_none());
    }

    #[test]
    fn test_list_restaurants() {
        let store = create_test_store();
        store
            .create_user(&register("Biryani Zone", "bz@x.io", "123456", true))
            .unwrap();
        store
            .create_user(&register("John", "john@x.io", "123456", false))
            .unwrap();

        let restaurants = store.list_restaurants().unwrap();
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].user_name, "Biryani Zone");
    }
}

//! Menu item storage

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

use super::{time_column, uuid_column, Database};
use crate::models::{MenuItem, NewMenuItem};

const ITEM_COLUMNS: &str = "id, choose_item_type, item_image_url, item_ingredients, item_price,
     item_title, user_id, created_at";

#[derive(Clone)]
pub struct MenuItemStore {
    db: Database,
}

impl MenuItemStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert an item owned by `owner`
    pub fn create(&self, owner: &Uuid, new: &NewMenuItem) -> Result<MenuItem> {
        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4(),
            choose_item_type: new.choose_item_type.clone(),
            item_image_url: new.item_image_url.clone(),
            item_ingredients: new.item_ingredients.clone(),
            item_price: new.item_price,
            item_title: new.item_title.clone(),
            user: *owner,
            created_at: now,
        };

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO menu_items (id, choose_item_type, item_image_url, item_ingredients,
                     item_price, item_title, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    item.id.to_string(),
                    item.choose_item_type,
                    item.item_image_url,
                    item.item_ingredients,
                    item.item_price,
                    item.item_title,
                    item.user.to_string(),
                    now.to_rfc3339(),
                ],
            )
            .context("Failed to insert menu item")?;
            Ok(())
        })?;

        info!("🍽️  Menu item {} added by {}", item.id, owner);
        Ok(item)
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<MenuItem>> {
        self.db.with_conn(|conn| {
            let item = conn
                .query_row(
                    &format!("SELECT {} FROM menu_items WHERE id = ?1", ITEM_COLUMNS),
                    params![id.to_string()],
                    row_to_item,
                )
                .optional()?;
            Ok(item)
        })
    }

    /// Fetch several items; missing ids are skipped, input order is kept
    pub fn get_many(&self, ids: &[Uuid]) -> Result<Vec<MenuItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let found = self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM menu_items WHERE id IN ({})",
                ITEM_COLUMNS, placeholders
            ))?;
            let items = stmt
                .query_map(params_from_iter(ids.iter().map(|id| id.to_string())), row_to_item)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })?;

        Ok(ids
            .iter()
            .filter_map(|id| found.iter().find(|item| item.id == *id).cloned())
            .collect())
    }

    pub fn list_by_owner(&self, owner: &Uuid) -> Result<Vec<MenuItem>> {
        self.list(
            &format!(
                "SELECT {} FROM menu_items WHERE user_id = ?1 ORDER BY created_at",
                ITEM_COLUMNS
            ),
            Some(owner.to_string()),
        )
    }

    pub fn list_all(&self) -> Result<Vec<MenuItem>> {
        self.list(
            &format!("SELECT {} FROM menu_items ORDER BY created_at", ITEM_COLUMNS),
            None,
        )
    }

    /// Delete by id; returns whether a row was removed
    pub fn delete(&self, id: &Uuid) -> Result<bool> {
        let rows = self.db.with_conn(|conn| {
            Ok(conn
                .execute(
                    "DELETE FROM menu_items WHERE id = ?1",
                    params![id.to_string()],
                )
                .context("Failed to delete menu item")?)
        })?;

        if rows > 0 {
            info!("🗑️  Menu item deleted: {}", id);
        }
        Ok(rows > 0)
    }

    fn list(&self, sql: &str, key: Option<String>) -> Result<Vec<MenuItem>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let items = match key {
                Some(key) => stmt.query_map(params![key], row_to_item)?,
                None => stmt.query_map([], row_to_item)?,
            }
            .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        id: uuid_column(row, 0)?,
        choose_item_type: row.get(1)?,
        item_image_url: row.get(2)?,
        item_ingredients: row.get(3)?,
        item_price: row.get(4)?,
        item_title: row.get(5)?,
        user: uuid_column(row, 6)?,
        created_at: time_column(row, 7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(title: &str, price: f64) -> NewMenuItem {
        NewMenuItem {
            choose_item_type: "Veg".to_string(),
            item_image_url: "https://img/1.png".to_string(),
            item_ingredients: "rice, spices".to_string(),
            item_price: price,
            item_title: title.to_string(),
        }
    }

    fn store() -> MenuItemStore {
        MenuItemStore::new(Database::open(":memory:").unwrap())
    }

    #[test]
    fn test_create_and_get() {
        let store = store();
        let owner = Uuid::new_v4();
        let item = store.create(&owner, &new_item("Biryani", 9.5)).unwrap();

        let loaded = store.get(&item.id).unwrap().unwrap();
        assert_eq!(loaded.item_title, "Biryani");
        assert_eq!(loaded.user, owner);
        assert_eq!(loaded.item_price, 9.5);
        assert!(store.get(&Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_get_many_keeps_order_and_skips_missing() {
        let store = store();
        let owner = Uuid::new_v4();
        let a = store.create(&owner, &new_item("A", 1.0)).unwrap();
        let b = store.create(&owner, &new_item("B", 2.0)).unwrap();

        let items = store.get_many(&[b.id, Uuid::new_v4(), a.id]).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.item_title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert!(store.get_many(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_list_by_owner_and_delete() {
        let store = store();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let item = store.create(&owner, &new_item("A", 1.0)).unwrap();
        store.create(&other, &new_item("B", 2.0)).unwrap();

        assert_eq!(store.list_by_owner(&owner).unwrap().len(), 1);
        assert_eq!(store.list_all().unwrap().len(), 2);

        assert!(store.delete(&item.id).unwrap());
        assert!(!store.delete(&item.id).unwrap());
        assert!(store.list_by_owner(&owner).unwrap().is_empty());
    }
}

//! Order storage

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, types::Type, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

use super::{time_column, uuid_column, Database};
use crate::models::{Order, OrderStatus};

const ORDER_COLUMNS: &str =
    "id, status, total_price, restaurant_id, user_id, item_list, created_at, updated_at";

#[derive(Clone)]
pub struct OrderStore {
    db: Database,
}

impl OrderStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new order; status starts at `PENDING`
    pub fn create(
        &self,
        restaurant: &Uuid,
        user: &Uuid,
        item_list: Vec<Uuid>,
        total_price: f64,
    ) -> Result<Order> {
        if item_list.is_empty() {
            return Err(anyhow!("Order must contain at least one menu item"));
        }

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            status: OrderStatus::default(),
            total_price,
            restaurant: *restaurant,
            user: *user,
            item_list,
            created_at: now,
            updated_at: now,
        };
        let items_json = serde_json::to_string(&order.item_list)?;

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO orders (id, status, total_price, restaurant_id, user_id, item_list,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    order.id.to_string(),
                    order.status.as_str(),
                    order.total_price,
                    order.restaurant.to_string(),
                    order.user.to_string(),
                    items_json,
                    now.to_rfc3339(),
                ],
            )
            .context("Failed to insert order")?;
            Ok(())
        })?;

        info!(
            "🧾 Order {} placed by {} at {} ({} items)",
            order.id,
            user,
            restaurant,
            order.item_list.len()
        );
        Ok(order)
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<Order>> {
        self.db.with_conn(|conn| {
            let order = conn
                .query_row(
                    &format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS),
                    params![id.to_string()],
                    row_to_order,
                )
                .optional()?;
            Ok(order)
        })
    }

    /// Orders received by a restaurant, newest first
    pub fn list_for_restaurant(&self, restaurant: &Uuid) -> Result<Vec<Order>> {
        self.list("restaurant_id", restaurant)
    }

    /// Orders placed by a customer, newest first
    pub fn list_for_customer(&self, user: &Uuid) -> Result<Vec<Order>> {
        self.list("user_id", user)
    }

    /// Set the status; `None` when the order does not exist
    pub fn update_status(&self, id: &Uuid, status: OrderStatus) -> Result<Option<Order>> {
        let rows = self.db.with_conn(|conn| {
            Ok(conn
                .execute(
                    "UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id.to_string(), status.as_str(), Utc::now().to_rfc3339()],
                )
                .context("Failed to update order status")?)
        })?;

        if rows == 0 {
            return Ok(None);
        }

        info!("📦 Order {} -> {}", id, status.as_str());
        self.get(id)
    }

    fn list(&self, column: &str, key: &Uuid) -> Result<Vec<Order>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM orders WHERE {} = ?1 ORDER BY created_at DESC, rowid DESC",
                ORDER_COLUMNS, column
            ))?;
            let orders = stmt
                .query_map(params![key.to_string()], row_to_order)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(orders)
        })
    }
}

fn row_to_order(row: &Row<'_>) -> rusqlite::Result<Order> {
    let status: String = row.get(1)?;
    let items: String = row.get(5)?;

    Ok(Order {
        id: uuid_column(row, 0)?,
        status: OrderStatus::parse(&status).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                Type::Text,
                format!("unknown order status {}", status).into(),
            )
        })?,
        total_price: row.get(2)?,
        restaurant: uuid_column(row, 3)?,
        user: uuid_column(row, 4)?,
        item_list: serde_json::from_str(&items)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
        created_at: time_column(row, 6)?,
        updated_at: time_column(row, 7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> OrderStore {
        OrderStore::new(Database::open(":memory:").unwrap())
    }

    #[test]
    fn test_create_starts_pending() {
        let store = store();
        let (restaurant, customer, item) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let order = store.create(&restaurant, &customer, vec![item], 10.0).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let loaded = store.get(&order.id).unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[test]
    fn test_empty_item_list_rejected() {
        let store = store();
        assert!(store
            .create(&Uuid::new_v4(), &Uuid::new_v4(), vec![], 10.0)
            .is_err());
    }

    #[test]
    fn test_list_by_party() {
        let store = store();
        let (r1, r2, c1) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let item = Uuid::new_v4();

        let first = store.create(&r1, &c1, vec![item], 5.0).unwrap();
        let second = store.create(&r1, &c1, vec![item], 6.0).unwrap();
        store.create(&r2, &Uuid::new_v4(), vec![item], 7.0).unwrap();

        let for_r1 = store.list_for_restaurant(&r1).unwrap();
        assert_eq!(for_r1.len(), 2);
        // newest first
        assert_eq!(for_r1[0].id, second.id);
        assert_eq!(for_r1[1].id, first.id);

        assert_eq!(store.list_for_customer(&c1).unwrap().len(), 2);
        assert!(store.list_for_customer(&r1).unwrap().is_empty());
    }

    #[test]
    fn test_update_status() {
        let store = store();
        let order = store
            .create(&Uuid::new_v4(), &Uuid::new_v4(), vec![Uuid::new_v4()], 10.0)
            .unwrap();

        let updated = store
            .update_status(&order.id, OrderStatus::Delivered)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Delivered);
        assert!(store
            .update_status(&Uuid::new_v4(), OrderStatus::Delivered)
            .unwrap()
            .is_none());
    }
}

//! Shared application state handed to every handler

use anyhow::Result;
use std::sync::Arc;

use crate::auth::{JwtHandler, LogDelivery, PasswordHasher, ResetDelivery, UserStore};
use crate::config::Config;
use crate::images::{ImageStore, LocalImageStore};
use crate::store::{Database, MenuItemStore, OrderStore};

#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub menu_items: MenuItemStore,
    pub orders: OrderStore,
    pub jwt_handler: Arc<JwtHandler>,
    pub reset_delivery: Arc<dyn ResetDelivery>,
    pub images: Arc<dyn ImageStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the store and wire the default collaborators
    pub fn new(config: Config) -> Result<Self> {
        let db = Database::open(&config.db_path)?;
        Ok(Self::with_database(db, config))
    }

    pub fn with_database(db: Database, config: Config) -> Self {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let jwt_handler = JwtHandler::new(&config.jwt_secret, config.jwt_expire_days);

        Self {
            users: UserStore::new(db.clone(), hasher),
            menu_items: MenuItemStore::new(db.clone()),
            orders: OrderStore::new(db),
            jwt_handler: Arc::new(jwt_handler),
            reset_delivery: Arc::new(LogDelivery),
            images: Arc::new(LocalImageStore::new(config.image_root.clone())),
            config: Arc::new(config),
        }
    }

    pub fn with_reset_delivery(mut self, delivery: Arc<dyn ResetDelivery>) -> Self {
        self.reset_delivery = delivery;
        self
    }

    pub fn with_image_store(mut self, images: Arc<dyn ImageStore>) -> Self {
        self.images = images;
        self
    }
}

//! Authentication Module
//! Mission: Credentials, identity tokens and the access guard

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod reset;
pub mod user_store;

pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use password::PasswordHasher;
pub use reset::{LogDelivery, ResetDelivery, ResetToken};
pub use user_store::UserStore;

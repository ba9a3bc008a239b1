//! Service configuration
//!
//! Every option is a CLI flag with an environment fallback; `.env` is loaded before parsing.

use clap::Parser;

pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

#[derive(Debug, Clone, Parser)]
#[command(name = "foodorder", version, about = "Food ordering REST backend")]
pub struct Config {
    /// Port for the HTTP listener
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite database file (":memory:" for an ephemeral store)
    #[arg(long, env = "DATABASE_PATH", default_value = "foodorder.db")]
    pub db_path: String,

    /// Secret used to sign identity tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEV_JWT_SECRET, hide_default_value = true)]
    pub jwt_secret: String,

    #[arg(long, env = "JWT_EXPIRE_DAYS", default_value_t = 30)]
    pub jwt_expire_days: i64,

    #[arg(long, env = "JWT_COOKIE_EXPIRE_DAYS", default_value_t = 30)]
    pub jwt_cookie_expire_days: i64,

    /// Also accept the token from the `token` cookie
    #[arg(long, env = "USE_COOKIE")]
    pub use_cookie: bool,

    /// Production mode marks cookies `Secure`
    #[arg(long, env = "PRODUCTION")]
    pub production: bool,

    #[arg(long, env = "BCRYPT_COST", default_value_t = 10)]
    pub bcrypt_cost: u32,

    #[arg(long, env = "RESET_TOKEN_EXPIRE_MINUTES", default_value_t = 10)]
    pub reset_token_expire_minutes: i64,

    /// Base URL used when building password-reset links
    #[arg(long, env = "PUBLIC_URL", default_value = "http://localhost:5000")]
    pub public_url: String,

    /// Root directory for uploaded images
    #[arg(long, env = "IMAGE_ROOT", default_value = "uploads")]
    pub image_root: String,
}

impl Config {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// Deterministic configuration for tests: in-memory store, minimum bcrypt cost
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            db_path: ":memory:".to_string(),
            jwt_secret: "test-secret-key-12345".to_string(),
            jwt_expire_days: 30,
            jwt_cookie_expire_days: 30,
            use_cookie: false,
            production: false,
            bcrypt_cost: 4,
            reset_token_expire_minutes: 10,
            public_url: "http://localhost:5000".to_string(),
            image_root: std::env::temp_dir()
                .join("foodorder-test-images")
                .to_string_lossy()
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_cli() {
        let config = Config::try_parse_from(["foodorder"]).unwrap();
        // Environment may override; only check flags that tests never set
        assert!(config.reset_token_expire_minutes > 0);
        assert!(config.jwt_expire_days > 0);
    }

    #[test]
    fn test_flags_override() {
        let config = Config::try_parse_from([
            "foodorder",
            "--port",
            "8080",
            "--use-cookie",
            "--db-path",
            ":memory:",
            "--bcrypt-cost",
            "6",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.use_cookie);
        assert_eq!(config.db_path, ":memory:");
        assert_eq!(config.bcrypt_cost, 6);
    }

    #[test]
    fn test_dev_secret_detection() {
        let mut config = Config::for_tests();
        assert!(!config.uses_dev_secret());
        config.jwt_secret = DEV_JWT_SECRET.to_string();
        assert!(config.uses_dev_secret());
    }
}

use config::{Config, ConfigError, Environment};
use dotenv::dotenv;
use serde::Deserialize;

fn default_port() -> u16 {
    3000
}

fn default_pool_size() -> u32 {
    10
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub jwt_secret: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok(); // Load .env file if present
        Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_environment() {
        std::env::set_var("DATABASE_URL", "postgres://localhost/homestay_test");
        std::env::set_var("JWT_SECRET", "test-secret");
        std::env::set_var("PORT", "8181");

        let config = AppConfig::load().unwrap();
        assert_eq!(config.database_url, "postgres://localhost/homestay_test");
        assert_eq!(config.port, 8181);
        assert_eq!(config.pool_size, default_pool_size());
    }
}

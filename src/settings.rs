use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("pg_database_url must be set when store = \"postgres\"")]
    MissingDatabaseUrl,

    #[error("{0} must be greater than zero")]
    ZeroSized(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub pg_database_url: Option<String>,
    pub pg_pool_size: u32,
    /// Threads running blocking diesel queries.
    pub db_workers: usize,
    /// Allowed origin for the admin frontend; any origin when unset.
    pub cors_origin: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub log: String,
}

impl Settings {
    /// Defaults, then `settings.toml` if present, then `ADMIN_*` environment variables.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_builder(
            Self::defaults()?
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("ADMIN").try_parsing(true)),
        )
    }

    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080_i64)?
            .set_default("store", "postgres")?
            .set_default("pg_pool_size", 10_i64)?
            .set_default("db_workers", 5_i64)?
            .set_default("log", "info")
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.store == StoreBackend::Postgres && self.pg_database_url.is_none() {
            return Err(SettingsError::MissingDatabaseUrl);
        }
        if self.pg_pool_size == 0 {
            return Err(SettingsError::ZeroSized("pg_pool_size"));
        }
        if self.db_workers == 0 {
            return Err(SettingsError::ZeroSized("db_workers"));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn with_toml(toml: &str) -> Result<Settings, SettingsError> {
        Settings::from_builder(Settings::defaults().unwrap().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn memory_store_needs_no_database_url() {
        let settings = with_toml(r#"store = "memory""#).unwrap();

        assert_eq!(settings.store, StoreBackend::Memory);
        assert_eq!(settings.bind_address(), ("127.0.0.1", 8080));
        assert_eq!(settings.db_workers, 5);
        assert!(settings.cors_origin.is_none());
    }

    #[test]
    fn postgres_store_requires_database_url() {
        let err = with_toml("port = 9000").unwrap_err();

        assert!(matches!(err, SettingsError::MissingDatabaseUrl));
    }

    #[test]
    fn overrides_replace_defaults() {
        let settings = with_toml(
            r#"
            port = 9090
            pg_database_url = "postgres://admin@localhost/reservations"
            pg_pool_size = 4
            cors_origin = "http://localhost:3000"
            "#,
        )
        .unwrap();

        assert_eq!(settings.store, StoreBackend::Postgres);
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.pg_pool_size, 4);
        assert_eq!(settings.cors_origin.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = with_toml("store = \"memory\"\ndb_workers = 0").unwrap_err();

        assert!(matches!(err, SettingsError::ZeroSized("db_workers")));
    }
}

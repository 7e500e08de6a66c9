//! Server configuration loaded from environment variables.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::db::Database;

const HOST_VAR: &str = "PLANET_API_HOST";
const PORT_VAR: &str = "PLANET_API_PORT";
const DATABASE_VAR: &str = "PLANET_API_DATABASE";

pub const DEFAULT_PORT: u16 = 3000;

/// Where the planet table lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// `planets.db` under the platform data directory.
    Default,
    /// Private in-memory database, discarded on shutdown.
    Memory,
    Path(PathBuf),
}

impl DatabaseLocation {
    /// `:memory:` selects an in-memory database; anything else is a file path.
    pub fn parse(value: &str) -> Self {
        match value {
            ":memory:" => Self::Memory,
            path => Self::Path(PathBuf::from(path)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database: DatabaseLocation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            database: DatabaseLocation::Default,
        }
    }
}

impl Config {
    /// Load configuration from `PLANET_API_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Build a configuration from `(name, value)` pairs, falling back to the
    /// defaults for anything unset.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let mut config = Self::default();

        if let Some(host) = vars.get(HOST_VAR) {
            config.host = host
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", HOST_VAR, host))?;
        }

        if let Some(port) = vars.get(PORT_VAR) {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", PORT_VAR, port))?;
        }

        if let Some(database) = vars.get(DATABASE_VAR).filter(|v| !v.is_empty()) {
            config.database = DatabaseLocation::parse(database);
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Open the configured database and bring its schema up to date.
    pub fn open_database(&self) -> Result<Database> {
        let db = match &self.database {
            DatabaseLocation::Default => Database::open_default()?,
            DatabaseLocation::Memory => Database::open_memory()?,
            DatabaseLocation::Path(path) => Database::open(path.clone())?,
        };
        db.migrate().context("Failed to run migrations")?;
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_vars(vars(&[
            ("PLANET_API_HOST", "0.0.0.0"),
            ("PLANET_API_PORT", "8080"),
            ("PLANET_API_DATABASE", "/var/lib/planets.db"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(
            config.database,
            DatabaseLocation::Path(PathBuf::from("/var/lib/planets.db"))
        );
    }

    #[test]
    fn memory_database() {
        let config = Config::from_vars(vars(&[("PLANET_API_DATABASE", ":memory:")])).unwrap();
        assert_eq!(config.database, DatabaseLocation::Memory);
        assert!(config.open_database().is_ok());
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_vars(vars(&[("PLANET_API_PORT", "lots")])).unwrap_err();
        assert!(err.to_string().contains("PLANET_API_PORT"));
    }

    #[test]
    fn rejects_bad_host() {
        assert!(Config::from_vars(vars(&[("PLANET_API_HOST", "not-an-ip")])).is_err());
    }
}

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://library.db?mode=rwc";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub bind_addr: SocketAddr,
	pub max_connections: u32,
	pub acquire_timeout: Duration,
}

impl Config {
	/// Reads settings from the process environment, `.env` included when the
	/// caller has loaded it with dotenvy beforehand.
	pub fn from_env() -> Result<Config> {
		Config::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
		let database_url = lookup("DATABASE_URL")
			.unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

		let bind_addr = parse_or(&lookup, "BIND_ADDR", || {
			SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
		})?;
		let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", || DEFAULT_MAX_CONNECTIONS)?;
		let timeout_secs = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", || DEFAULT_ACQUIRE_TIMEOUT_SECS)?;

		Ok(Config {
			database_url,
			bind_addr,
			max_connections,
			acquire_timeout: Duration::from_secs(timeout_secs),
		})
	}
}

fn parse_or<T: FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &'static str,
	default: impl FnOnce() -> T,
) -> Result<T> {
	match lookup(key) {
		Some(value) => value.trim().parse().map_err(|_| AppError::Config { key, value }),
		None => Ok(default()),
	}
}

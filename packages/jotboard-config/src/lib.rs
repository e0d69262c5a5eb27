mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Notes, Postgres, Security, Service, Storage};

use std::{fs, net::SocketAddr, path::Path};

const MAX_SESSION_INACTIVITY_DAYS: i64 = 3_650;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	let http_addr = parse_bind("service.http_bind", &cfg.service.http_bind)?;
	let admin_addr = parse_bind("service.admin_bind", &cfg.service.admin_bind)?;

	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.http_bind must be a loopback address when bind_localhost_only is true."
				.to_string(),
		});
	}
	if !admin_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.admin_bind must be a loopback address.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.security.min_password_chars == 0 {
		return Err(Error::Validation {
			message: "security.min_password_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.security.session_inactivity_days <= 0 {
		return Err(Error::Validation {
			message: "security.session_inactivity_days must be greater than zero.".to_string(),
		});
	}
	if cfg.security.session_inactivity_days > MAX_SESSION_INACTIVITY_DAYS {
		return Err(Error::Validation {
			message: format!(
				"security.session_inactivity_days must be at most {MAX_SESSION_INACTIVITY_DAYS}."
			),
		});
	}

	for (label, value) in [
		("notes.max_title_chars", cfg.notes.max_title_chars),
		("notes.max_text_chars", cfg.notes.max_text_chars),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn parse_bind(label: &str, value: &str) -> Result<SocketAddr> {
	value
		.parse()
		.map_err(|_| Error::Validation { message: format!("{label} must be a socket address.") })
}

fn normalize(cfg: &mut Config) {
	cfg.security.admin_auth_token = cfg
		.security
		.admin_auth_token
		.take()
		.map(|token| token.trim().to_string())
		.filter(|token| !token.is_empty());
}

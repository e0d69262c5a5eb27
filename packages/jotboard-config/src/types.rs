use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub security: Security,
	#[serde(default)]
	pub notes: Notes,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// Optional. Bearer token required by the admin router when set.
	pub admin_auth_token: Option<String>,
	#[serde(default = "default_min_password_chars")]
	pub min_password_chars: u32,
	/// Sets the `Secure` attribute on the session cookie. Enable behind HTTPS.
	#[serde(default)]
	pub session_secure_cookie: bool,
	#[serde(default = "default_session_inactivity_days")]
	pub session_inactivity_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct Notes {
	#[serde(default = "default_max_title_chars")]
	pub max_title_chars: u32,
	#[serde(default = "default_max_text_chars")]
	pub max_text_chars: u32,
}
impl Default for Notes {
	fn default() -> Self {
		Self { max_title_chars: default_max_title_chars(), max_text_chars: default_max_text_chars() }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_min_password_chars() -> u32 {
	8
}

fn default_session_inactivity_days() -> i64 {
	7
}

fn default_max_title_chars() -> u32 {
	200
}

fn default_max_text_chars() -> u32 {
	20_000
}

//! Server configuration: optional TOML file, `${VAR}` expansion, then
//! environment overrides.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 3001
//!
//! [database]
//! url = "postgres://${DB_USER}@localhost/jobly"
//! pool_size = 16
//! slow_query_ms = 200
//!
//! [auth]
//! secret_key = "${SECRET_KEY}"
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATABASE_URL: &str = "postgresql:///jobly";
pub const DEFAULT_SECRET_KEY: &str = "secret-dev";
pub const DEFAULT_SLOW_QUERY_MS: u64 = 200;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Statements slower than this are logged at WARN. `0` disables.
    #[serde(default = "default_slow_query_ms")]
    pub slow_query_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            pool_size: default_pool_size(),
            slow_query_ms: default_slow_query_ms(),
        }
    }
}

impl DatabaseConfig {
    pub fn slow_query_threshold(&self) -> Option<Duration> {
        (self.slow_query_ms > 0).then(|| Duration::from_millis(self.slow_query_ms))
    }
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret for signing and verifying tokens.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
        }
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_pool_size() -> usize {
    jobly_db::pool::DEFAULT_POOL_SIZE
}

fn default_slow_query_ms() -> u64 {
    DEFAULT_SLOW_QUERY_MS
}

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

impl ServerConfig {
    /// Load from `path` (if any), then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();

        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("failed to read config file {}: {e}", path.display())
                })?;
                Self::from_toml_str(&raw, &lookup).map_err(|e| {
                    anyhow::anyhow!("failed to load config file {}: {e:#}", path.display())
                })?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document and expand `${VAR}` references in string values.
    pub fn from_toml_str(
        raw: &str,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.expand_env(lookup)?;
        Ok(config)
    }

    fn expand_env(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        self.server.bind = expand_env_vars(&self.server.bind, lookup)?;
        self.database.url = expand_env_vars(&self.database.url, lookup)?;
        self.auth.secret_key = expand_env_vars(&self.auth.secret_key, lookup)?;
        Ok(())
    }

    /// `DATABASE_URL`, `SECRET_KEY`, `PORT` and `JOBLY_BIND` win over the file.
    pub fn apply_env_overrides(
        &mut self,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = lookup("SECRET_KEY") {
            self.auth.secret_key = secret;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {port:?}: {e}"))?;
        }
        if let Some(bind) = lookup("JOBLY_BIND") {
            self.server.bind = bind;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url must not be empty");
        }
        if self.database.pool_size == 0 {
            anyhow::bail!("database.pool_size must be at least 1");
        }
        if self.auth.secret_key.is_empty() {
            anyhow::bail!("auth.secret_key must not be empty");
        }
        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }
        Ok(())
    }

    /// `bind:port` for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

fn expand_env_vars(input: &str, lookup: &dyn Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}}}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = lookup(&key)
                .ok_or_else(|| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

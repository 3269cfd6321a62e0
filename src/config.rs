use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SECRET_KEY: &str = "change-me-in-production-12345";

/// Environment variables read on top of the defaults.
const ENV_KEYS: &[&str] = &[
    "SECRET_KEY",
    "DB_PATH",
    "DEBUG",
    "LISTEN_ADDR",
    "LOGLEVEL",
    "LOCK_TIMEOUT_SECS",
    "SECURE_COOKIE",
    "ADMIN_USERNAME",
    "ADMIN_PASSWORD",
    "SESSION_TTL_SECS",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Master secret for the session cookie key.
    pub secret_key: String,
    /// SQLite database file.
    pub db_path: PathBuf,
    pub debug: bool,
    pub listen_addr: String,
    /// `None` falls back to `debug`/`info` depending on the debug flag.
    pub loglevel: Option<String>,
    /// How long SQLite waits on a held write lock before reporting busy.
    pub lock_timeout_secs: u64,
    pub secure_cookie: bool,
    pub admin_username: String,
    pub admin_password: String,
    /// Idle-independent lifetime of an admin session.
    pub session_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            db_path: PathBuf::from("leads.db"),
            debug: false,
            listen_addr: "0.0.0.0:5000".to_string(),
            loglevel: None,
            lock_timeout_secs: 20,
            secure_cookie: false,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            session_ttl_secs: 24 * 60 * 60,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(ENV_KEYS))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn loglevel(&self) -> &str {
        match self.loglevel.as_deref() {
            Some(level) => level,
            None if self.debug => "debug",
            None => "info",
        }
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_environment() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load()?;
            assert_eq!(cfg.db_path, PathBuf::from("leads.db"));
            assert_eq!(cfg.listen_addr, "0.0.0.0:5000");
            assert_eq!(cfg.loglevel(), "info");
            assert_eq!(cfg.lock_timeout(), Duration::from_secs(20));
            assert!(cfg.uses_default_secret());
            assert_eq!(cfg.session_ttl(), Duration::from_secs(86400));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DB_PATH", "data/test.db");
            jail.set_env("DEBUG", "true");
            jail.set_env("SECRET_KEY", "a-much-better-secret");
            jail.set_env("LOCK_TIMEOUT_SECS", "5");
            let cfg = Config::load()?;
            assert_eq!(cfg.db_path, PathBuf::from("data/test.db"));
            assert!(cfg.debug);
            assert_eq!(cfg.loglevel(), "debug");
            assert_eq!(cfg.lock_timeout_secs, 5);
            assert!(!cfg.uses_default_secret());
            Ok(())
        });
    }

    #[test]
    fn malformed_value_fails_the_whole_load() {
        Jail::expect_with(|jail| {
            jail.set_env("SECRET_KEY", "prod-secret");
            jail.set_env("DB_PATH", "/data/prod.db");
            jail.set_env("LOCK_TIMEOUT_SECS", "20s");
            let err = Config::load().expect_err("a non-numeric timeout must not load");
            assert!(
                err.to_string().to_lowercase().contains("lock_timeout_secs"),
                "unexpected error: {err}"
            );
            Ok(())
        });
    }
}

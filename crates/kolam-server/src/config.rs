//! Server configuration, read from the environment (after `.env`).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

pub const DEFAULT_DB_PATH: &str = "kolam_art.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;
/// Canvas exports are PNGs of a few hundred KiB; leave generous headroom.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Placeholder secrets that must never sign real sessions.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Debug)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    /// `None` means a fresh secret is generated at startup.
    pub jwt_secret: Option<String>,
    pub token_ttl_days: i64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("KOLAM_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let host = lookup("KOLAM_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port: u16 = parse_or(&lookup, "KOLAM_PORT", DEFAULT_PORT)?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid KOLAM_HOST/KOLAM_PORT: {}:{}", host, port))?;

        let jwt_secret = lookup("KOLAM_JWT_SECRET").filter(|s| !s.is_empty());
        if let Some(secret) = &jwt_secret {
            if PLACEHOLDER_SECRETS.contains(&secret.as_str()) {
                bail!("KOLAM_JWT_SECRET is still a placeholder; set a random value");
            }
        }

        let token_ttl_days: i64 = parse_or(&lookup, "KOLAM_TOKEN_TTL_DAYS", DEFAULT_TOKEN_TTL_DAYS)?;
        if token_ttl_days <= 0 {
            bail!("KOLAM_TOKEN_TTL_DAYS must be positive, got {}", token_ttl_days);
        }

        let max_upload_bytes =
            parse_or(&lookup, "KOLAM_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            db_path: db_path.into(),
            addr,
            jwt_secret,
            token_ttl_days,
            max_upload_bytes,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("kolam_art.db"));
        assert_eq!(cfg.addr, "0.0.0.0:3000".parse().unwrap());
        assert!(cfg.jwt_secret.is_none());
        assert_eq!(cfg.token_ttl_days, 30);
        assert_eq!(cfg.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("KOLAM_DB_PATH", "/tmp/k.db"),
            ("KOLAM_HOST", "127.0.0.1"),
            ("KOLAM_PORT", "8080"),
            ("KOLAM_JWT_SECRET", "s3cr3t"),
            ("KOLAM_TOKEN_TTL_DAYS", "7"),
        ])
        .unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cfg.jwt_secret.as_deref(), Some("s3cr3t"));
        assert_eq!(cfg.token_ttl_days, 7);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("KOLAM_PORT", "eighty")]).is_err());
        assert!(config(&[("KOLAM_TOKEN_TTL_DAYS", "0")]).is_err());
        assert!(config(&[("KOLAM_JWT_SECRET", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn empty_secret_means_generate() {
        let cfg = config(&[("KOLAM_JWT_SECRET", "")]).unwrap();
        assert!(cfg.jwt_secret.is_none());
    }
}

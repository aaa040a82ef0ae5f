use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
pub const DEFAULT_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    /// Access token lifetime in seconds
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,

    pub upload: UploadConfig,
}

/// Policy applied to uploaded profile images.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads/employees"),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            allowed_mime_types: DEFAULT_IMAGE_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = UploadConfig::default();
        let upload = UploadConfig {
            dir: env::var("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.dir),
            max_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.max_bytes)?,
            allowed_extensions: list_var("ALLOWED_IMAGE_EXTENSIONS")
                .unwrap_or(defaults.allowed_extensions),
            allowed_mime_types: list_var("ALLOWED_IMAGE_MIME_TYPES")
                .unwrap_or(defaults.allowed_mime_types),
        };

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_ttl: parse_var("ACCESS_TOKEN_TTL", 1800)?, // default 30 min
            rate_login_per_min: parse_var("RATE_LOGIN_PER_MIN", 60)?,
            rate_register_per_min: parse_var("RATE_REGISTER_PER_MIN", 30)?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            upload,
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Comma separated, lower-cased list. `None` when unset or empty.
fn list_var(key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = env::var(key)
        .ok()?
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if items.is_empty() { None } else { Some(items) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_defaults_match_image_policy() {
        let upload = UploadConfig::default();
        assert_eq!(upload.max_bytes, 5 * 1024 * 1024);
        assert_eq!(upload.allowed_extensions, vec!["jpg", "jpeg", "png", "gif", "webp"]);
        assert!(upload.allowed_mime_types.contains(&"image/webp".to_string()));
    }

    #[test]
    fn parse_var_falls_back_when_unset() {
        let value: u32 = parse_var("LMS_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}

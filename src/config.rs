//! Application configuration management.
//!
//! Configuration is read from environment variables with the `envy` crate,
//! after an optional `.env` file has been loaded by `dotenvy`.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `MEDIA_ROOT` (optional): directory for uploaded order files, defaults to `./media`
/// - `MEDIA_BASE_URL` (optional): public URL prefix of `MEDIA_ROOT`,
///   defaults to `http://localhost:3000/media/`
/// - `MAX_UPLOAD_BYTES` (optional): request body limit for order uploads, defaults to 20 MiB
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_media_root")]
    pub media_root: String,

    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

fn default_media_root() -> String {
    "./media".to_string()
}

fn default_media_base_url() -> String {
    "http://localhost:3000/media/".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` first if present (a missing file is not an error), then
    /// deserializes the process environment. Field names map to upper-case
    /// variables: `media_root` -> `MEDIA_ROOT`.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a value cannot be
    /// parsed into its expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_settings() {
        let vars = vec![(
            "DATABASE_URL".to_string(),
            "postgres://localhost/freight".to_string(),
        )];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.media_root, "./media");
        assert_eq!(config.media_base_url, "http://localhost:3000/media/");
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let vars = vec![("SERVER_PORT".to_string(), "8080".to_string())];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let vars = vec![
            ("DATABASE_URL".to_string(), "postgres://db/freight".to_string()),
            ("SERVER_PORT".to_string(), "8080".to_string()),
            ("MAX_UPLOAD_BYTES".to_string(), "1024".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.max_upload_bytes, 1024);
    }
}

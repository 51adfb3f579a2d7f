//! Application configuration management

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

/// Application configuration, resolved from environment variables first,
/// then a YAML config file
#[derive(Debug, Clone)]
pub struct Config {
    /// Plex server base URL
    pub plex_url: String,

    /// Plex authentication token
    pub plex_token: String,

    /// Radarr base URL
    pub radarr_url: String,

    /// Radarr API key
    pub radarr_api_key: String,

    /// Name of the quality profile to apply to watchlisted movies
    pub target_profile: String,

    /// Minutes between sync passes in interval mode
    pub sync_interval_minutes: u64,

    /// Liveness endpoint port
    pub port: u16,
}

/// On-disk config file layout
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    plex: ServiceSection,
    #[serde(default)]
    radarr: ServiceSection,
    target_profile: Option<String>,
    interval_minutes: Option<u64>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceSection {
    url: Option<String>,
    token: Option<String>,
    api_key: Option<String>,
}

impl Config {
    /// Load configuration, environment variables overriding the config file
    pub fn load(config_path: &str) -> Result<Self> {
        let file = ConfigFile::read(config_path)?;

        let plex_url = env::var("PLEX_URL")
            .ok()
            .or(file.plex.url)
            .context("PLEX_URL is required (env or config file)")?;

        let plex_token = env::var("PLEX_TOKEN")
            .ok()
            .or(file.plex.token)
            .context("PLEX_TOKEN is required (env or config file)")?;

        let radarr_url = env::var("RADARR_URL")
            .ok()
            .or(file.radarr.url)
            .context("RADARR_URL is required (env or config file)")?;

        let radarr_api_key = env::var("RADARR_API_KEY")
            .ok()
            .or(file.radarr.api_key)
            .context("RADARR_API_KEY is required (env or config file)")?;

        let target_profile = env::var("TARGET_PROFILE")
            .ok()
            .or(file.target_profile)
            .unwrap_or_else(|| "HD-1080p".to_string());

        let sync_interval_minutes = match env::var("SYNC_INTERVAL_MINUTES") {
            Ok(value) => value.parse().context("Invalid SYNC_INTERVAL_MINUTES")?,
            Err(_) => file.interval_minutes.unwrap_or(60),
        };

        let port = match env::var("PORT") {
            Ok(value) => value.parse().context("Invalid PORT")?,
            Err(_) => file.port.unwrap_or(8080),
        };

        Ok(Self {
            plex_url,
            plex_token,
            radarr_url,
            radarr_api_key,
            target_profile,
            sync_interval_minutes,
            port,
        })
    }
}

impl ConfigFile {
    fn read(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            warn!(path = %path, "Config file not found, using environment variables only");
            return Ok(ConfigFile::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parses_yaml_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "plex:\n  url: http://plex:32400\n  token: abc\n\
             radarr:\n  url: http://radarr:7878\n  api_key: def\n\
             target_profile: Ultra-HD\ninterval_minutes: 15\nport: 9090\n"
        )
        .unwrap();

        let parsed = ConfigFile::read(file.path().to_str().unwrap()).unwrap();
        assert_eq!(parsed.plex.url.as_deref(), Some("http://plex:32400"));
        assert_eq!(parsed.plex.token.as_deref(), Some("abc"));
        assert_eq!(parsed.radarr.url.as_deref(), Some("http://radarr:7878"));
        assert_eq!(parsed.radarr.api_key.as_deref(), Some("def"));
        assert_eq!(parsed.target_profile.as_deref(), Some("Ultra-HD"));
        assert_eq!(parsed.interval_minutes, Some(15));
        assert_eq!(parsed.port, Some(9090));
    }

    #[test]
    fn test_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "plex:\n  url: http://plex:32400\n").unwrap();

        let parsed = ConfigFile::read(file.path().to_str().unwrap()).unwrap();
        assert_eq!(parsed.plex.url.as_deref(), Some("http://plex:32400"));
        assert_eq!(parsed.plex.token, None);
        assert_eq!(parsed.radarr.url, None);
        assert_eq!(parsed.target_profile, None);
    }

    #[test]
    fn test_missing_config_file_is_not_fatal() {
        let parsed = ConfigFile::read("/nonexistent/watchsync.yaml").unwrap();
        assert!(parsed.plex.url.is_none());
        assert!(parsed.radarr.url.is_none());
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "plex: [not, a, mapping\n").unwrap();

        assert!(ConfigFile::read(file.path().to_str().unwrap()).is_err());
    }
}

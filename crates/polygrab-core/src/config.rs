use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Remote API endpoint and request shape (`[api]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint that receives the authenticated form POST.
    pub url: String,
    /// Page the operator works on; sent as `Referer`.
    pub page_url: String,
    /// Sent as `Origin`.
    pub origin: String,
    /// Name of the single form field carrying the item identifier.
    pub item_field: String,
    /// Request header that carries the browser-captured session token.
    pub token_header: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds; expiry surfaces as a transport error.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://polymer.nims.go.jp/PoLyInfo/api/6627766".to_string(),
            page_url: "https://polymer.nims.go.jp/PoLyInfo/search".to_string(),
            origin: "https://polymer.nims.go.jp".to_string(),
            item_field: "pid_uuid".to_string(),
            token_header: "captchaId".to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/polygrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygrabConfig {
    /// Directory holding saved records, pointer files, the index and the error log.
    pub output_dir: PathBuf,
    /// Newline-delimited list of item identifiers.
    pub input_path: PathBuf,
    /// HAR file the operator exports from the browser after triggering one request.
    pub har_path: PathBuf,
    /// Also capture the browser's `Cookie` header and send it on automated requests.
    #[serde(default)]
    pub forward_cookies: bool,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Default for PolygrabConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data/polyinfo_json"),
            input_path: PathBuf::from("data/pid_uuids.txt"),
            har_path: PathBuf::from("data/session.har"),
            forward_cookies: false,
            api: ApiConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("polygrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PolygrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PolygrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PolygrabConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = PolygrabConfig::default();
        assert_eq!(cfg.output_dir, PathBuf::from("data/polyinfo_json"));
        assert_eq!(cfg.input_path, PathBuf::from("data/pid_uuids.txt"));
        assert!(!cfg.forward_cookies);
        assert_eq!(cfg.api.item_field, "pid_uuid");
        assert_eq!(cfg.api.token_header, "captchaId");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = PolygrabConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: PolygrabConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.output_dir, cfg.output_dir);
        assert_eq!(parsed.har_path, cfg.har_path);
        assert_eq!(parsed.api.url, cfg.api.url);
        assert_eq!(parsed.api.timeout_secs, cfg.api.timeout_secs);
    }

    #[test]
    fn config_toml_api_section_optional() {
        let toml = r#"
            output_dir = "/srv/out"
            input_path = "ids.txt"
            har_path = "session.har"
        "#;
        let cfg: PolygrabConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/srv/out"));
        assert!(!cfg.forward_cookies);
        assert_eq!(cfg.api.origin, "https://polymer.nims.go.jp");
    }

    #[test]
    fn config_toml_custom_api() {
        let toml = r#"
            output_dir = "out"
            input_path = "ids.txt"
            har_path = "s.har"
            forward_cookies = true

            [api]
            url = "http://127.0.0.1:8080/api"
            page_url = "http://127.0.0.1:8080/search"
            origin = "http://127.0.0.1:8080"
            item_field = "id"
            token_header = "X-Token"
            connect_timeout_secs = 2
            timeout_secs = 5
        "#;
        let cfg: PolygrabConfig = toml::from_str(toml).unwrap();
        assert!(cfg.forward_cookies);
        assert_eq!(cfg.api.item_field, "id");
        assert_eq!(cfg.api.token_header, "X-Token");
        assert_eq!(cfg.api.timeout_secs, 5);
    }
}

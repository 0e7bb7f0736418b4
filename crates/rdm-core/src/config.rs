use crate::client::parse_base_url;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "rdm.yaml";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DeviceConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_device_url")]
    pub url: String,
    /// Per-request timeout. Unset means requests wait forever.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_device_url() -> String {
    "http://192.168.2.120/".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            url: default_device_url(),
            request_timeout_secs: None,
        }
    }
}

impl DeviceConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

// ---------------------------------------------------------------------------
// WatchConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_interval() -> u64 {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("rdm-status")
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            output_dir: default_output_dir(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_interval")]
    pub poll_interval_secs: u64,
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            poll_interval_secs: default_interval(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            device: DeviceConfig::default(),
            watch: WatchConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut push = |level: WarnLevel, message: String| {
            warnings.push(ConfigWarning { level, message })
        };

        if parse_base_url(&self.device.url).is_err() {
            push(
                WarnLevel::Error,
                format!(
                    "device.url '{}' is not an absolute http(s) url",
                    self.device.url
                ),
            );
        }

        match self.device.request_timeout_secs {
            Some(0) => push(
                WarnLevel::Error,
                "device.request_timeout_secs is 0; omit it to wait forever".to_string(),
            ),
            Some(t) if t > 300 => push(
                WarnLevel::Warning,
                format!("device.request_timeout_secs={t} (>300 is unusual)"),
            ),
            _ => {}
        }

        for (key, value) in [
            ("watch.interval_secs", self.watch.interval_secs),
            ("server.poll_interval_secs", self.server.poll_interval_secs),
        ] {
            if value == 0 {
                push(WarnLevel::Error, format!("{key} must be at least 1"));
            }
        }

        if self.version != 1 {
            push(
                WarnLevel::Warning,
                format!("unknown config version {}", self.version),
            );
        }

        warnings
    }

    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|w| w.level == WarnLevel::Error)
    }
}

/// Resolve the config file location.
///
/// Priority:
/// 1. `explicit` (`--config` flag / `RDM_CONFIG`)
/// 2. Walk upward from `start` looking for `rdm.yaml`
/// 3. `start/rdm.yaml` (may not exist; defaults apply)
pub fn resolve_path(explicit: Option<&Path>, start: &Path) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return candidate;
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => break,
        }
    }

    start.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.device.url, "http://192.168.2.120/");
        assert_eq!(parsed.server.port, 3141);
        assert!(parsed.device.request_timeout().is_none());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "device:\n  url: http://10.0.0.7\n  request_timeout_secs: 3\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.device.url, "http://10.0.0.7");
        assert_eq!(cfg.device.request_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(cfg.watch.interval_secs, 5);
        assert_eq!(cfg.watch.output_dir, PathBuf::from("rdm-status"));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_bad_url_is_error() {
        let mut cfg = Config::default();
        cfg.device.url = "ftp://node".into();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("device.url")));
        assert!(cfg.has_errors());
    }

    #[test]
    fn validate_zero_interval_is_error() {
        let mut cfg = Config::default();
        cfg.server.poll_interval_secs = 0;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("server.poll_interval_secs")));
    }

    #[test]
    fn validate_zero_timeout_is_error() {
        let mut cfg = Config::default();
        cfg.device.request_timeout_secs = Some(0);
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(warnings[0].message.contains("device.request_timeout_secs"));
        assert!(cfg.has_errors());
    }

    #[test]
    fn validate_long_timeout_is_warning() {
        let mut cfg = Config::default();
        cfg.device.request_timeout_secs = Some(900);
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert!(!cfg.has_errors());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut cfg = Config::default();
        cfg.device.url = "http://node.local/".into();
        cfg.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.device.url, "http://node.local/");
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(cfg.version, 1);
    }

    #[test]
    fn resolve_explicit_wins() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("other.yaml");
        assert_eq!(resolve_path(Some(&explicit), dir.path()), explicit);
    }

    #[test]
    fn resolve_walks_upward() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "version: 1\n").unwrap();
        let deep = dir.path().join("a/b");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(resolve_path(None, &deep), dir.path().join(CONFIG_FILE));
    }
}

use anyhow::Context;
use rdm_core::config::{self, Config};
use rdm_core::HttpSource;
use std::path::{Path, PathBuf};

/// Effective configuration plus where it came from.
pub struct Settings {
    pub path: PathBuf,
    pub config: Config,
}

impl Settings {
    /// Resolve and load the config file, then apply `--device`.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(explicit: Option<&Path>, device: Option<&str>) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let path = config::resolve_path(explicit, &cwd);
        let mut config = Config::load_or_default(&path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        if let Some(url) = device {
            config.device.url = url.to_string();
        }
        Ok(Self { path, config })
    }

    pub fn source(&self) -> anyhow::Result<HttpSource> {
        let source = HttpSource::new(&self.config.device.url)?
            .with_timeout(self.config.device.request_timeout());
        Ok(source)
    }
}

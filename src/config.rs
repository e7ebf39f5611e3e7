use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub collectors: CollectorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Where counters and SMART data come from. Sampling cadence and cache TTL are fixed.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorsConfig {
    #[serde(default = "default_sysfs_path")]
    pub sysfs_path: String,
    #[serde(default = "default_smartctl_path")]
    pub smartctl_path: String,
    /// When false no SMART queries are issued and rates are published without health data.
    #[serde(default = "default_smart_enabled")]
    pub smart_enabled: bool,
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        Self {
            sysfs_path: default_sysfs_path(),
            smartctl_path: default_smartctl_path(),
            smart_enabled: default_smart_enabled(),
        }
    }
}

fn default_sysfs_path() -> String {
    "/sys".into()
}

fn default_smartctl_path() -> String {
    "smartctl".into()
}

fn default_smart_enabled() -> bool {
    true
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            !self.collectors.sysfs_path.is_empty(),
            "collectors.sysfs_path must be non-empty"
        );
        anyhow::ensure!(
            !self.collectors.smart_enabled || !self.collectors.smartctl_path.is_empty(),
            "collectors.smartctl_path must be non-empty when smart_enabled is true"
        );
        Ok(())
    }
}

use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub gateway: GatewaySettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GatewaySettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    /// No timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl GatewaySettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load `config/dashboard.*` (optional) overlaid with `DASHBOARD__SECTION__KEY` env vars
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"));

    deserialize(builder)
}

fn deserialize(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<DashboardConfig> {
    let settings = builder.build()?;
    Ok(settings.try_deserialize()?)
}

use super::toml_config::RelayConfig;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "profile-relay")]
#[command(about = "Relays client profile creation requests to the salon CRM")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file; environment variables are used when omitted")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the listening port")]
    pub port: Option<u16>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 載入配置：優先使用 --config 檔案，否則讀取環境變數
    pub fn load(&self) -> Result<RelayConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                RelayConfig::from_file(path)?
            }
            None => {
                tracing::debug!("Loading configuration from environment");
                RelayConfig::from_env()?
            }
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(config)
    }
}

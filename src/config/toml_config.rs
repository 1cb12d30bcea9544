use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_NOTIFY_TIMEOUT_SECONDS: u64 = 5;
const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub crm: CrmConfig,
    pub cache_notify: Option<CacheNotifyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct CrmConfig {
    pub auth_url: String,
    pub api_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub location_id: String,
    pub request_timeout_seconds: Option<u64>,
}

// client_secret 不可出現在日誌
impl fmt::Debug for CrmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrmConfig")
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("location_id", &self.location_id)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheNotifyConfig {
    pub url: String,
    pub timeout_seconds: Option<u64>,
}

impl CacheNotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_NOTIFY_TIMEOUT_SECONDS))
    }
}

impl RelayConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CLIENT_SECRET})，註解行不處理
    fn substitute_env_vars(content: &str) -> Result<String> {
        Self::substitute_vars(content, |key| std::env::var(key).ok())
    }

    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let mut lines = Vec::new();
        for line in content.lines() {
            if line.trim_start().starts_with('#') {
                lines.push(line.to_string());
                continue;
            }

            let mut missing = None;
            let replaced = re
                .replace_all(line, |caps: &regex::Captures| {
                    lookup(&caps[1]).unwrap_or_else(|| {
                        missing.get_or_insert_with(|| caps[1].to_string());
                        String::new()
                    })
                })
                .into_owned();

            // 未設定的變數不可原樣留在配置中
            if let Some(field) = missing {
                return Err(RelayError::MissingConfigError { field });
            }
            lines.push(replaced);
        }

        Ok(lines.join("\n"))
    }

    /// 從環境變數載入配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| RelayError::MissingConfigError {
                    field: key.to_string(),
                })
        };
        let optional_number = |key: &str| -> Result<Option<u64>> {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
                    RelayError::InvalidConfigValueError {
                        field: key.to_string(),
                        value: raw.clone(),
                        reason: "Expected a whole number".to_string(),
                    }
                }),
                None => Ok(None),
            }
        };

        let port = match optional_number("PORT")? {
            Some(port) => u16::try_from(port).map_err(|_| RelayError::InvalidConfigValueError {
                field: "PORT".to_string(),
                value: port.to_string(),
                reason: "Port out of range".to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let cache_notify = lookup("CALLER_LOOKUP_CACHE_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|url| -> Result<CacheNotifyConfig> {
                Ok(CacheNotifyConfig {
                    url,
                    timeout_seconds: optional_number("CALLER_LOOKUP_CACHE_TIMEOUT_SECONDS")?,
                })
            })
            .transpose()?;

        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST")
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(default_host),
                port,
            },
            crm: CrmConfig {
                auth_url: required("AUTH_URL")?,
                api_url: required("API_URL")?,
                client_id: required("CLIENT_ID")?,
                client_secret: required("CLIENT_SECRET")?,
                tenant_id: required("TENANT_ID")?,
                location_id: required("LOCATION_ID")?,
                request_timeout_seconds: optional_number("CRM_REQUEST_TIMEOUT_SECONDS")?,
            },
            cache_notify,
        })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("server.port", u64::from(self.server.port), 1)?;
        validate_non_empty_string("server.host", &self.server.host)?;

        validate_url("crm.auth_url", &self.crm.auth_url)?;
        validate_url("crm.api_url", &self.crm.api_url)?;
        validate_non_empty_string("crm.client_id", &self.crm.client_id)?;
        validate_non_empty_string("crm.client_secret", &self.crm.client_secret)?;
        validate_non_empty_string("crm.tenant_id", &self.crm.tenant_id)?;
        validate_non_empty_string("crm.location_id", &self.crm.location_id)?;
        if let Some(timeout) = self.crm.request_timeout_seconds {
            validate_range("crm.request_timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        if let Some(notify) = &self.cache_notify {
            validate_url("cache_notify.url", &notify.url)?;
            if let Some(timeout) = notify.timeout_seconds {
                validate_range("cache_notify.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for CrmConfig {
    fn auth_url(&self) -> &str {
        &self.auth_url
    }

    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn client_secret(&self) -> &str {
        &self.client_secret
    }

    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn location_id(&self) -> &str {
        &self.location_id
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.request_timeout_seconds
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

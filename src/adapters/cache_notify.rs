use crate::config::CacheNotifyConfig;
use crate::domain::model::CacheNotice;
use crate::domain::ports::CacheNotifier;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Tells the caller-lookup cache about a newly created client.
pub struct HttpCacheNotifier {
    client: Client,
    url: String,
}

impl HttpCacheNotifier {
    pub fn new(config: &CacheNotifyConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl CacheNotifier for HttpCacheNotifier {
    async fn notify(&self, notice: &CacheNotice) -> Result<()> {
        tracing::debug!("Notifying cache at {} for client {}", self.url, notice.client_id);

        let response = self
            .client
            .post(&self.url)
            .json(notice)
            .send()
            .await
            .map_err(|e| RelayError::CacheNotifyError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::CacheNotifyError {
                message: format!("cache service responded with status {}", status.as_u16()),
            });
        }

        Ok(())
    }
}

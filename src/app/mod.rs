use crate::adapters::{HttpCacheNotifier, HttpCrmClient};
use crate::config::{CrmConfig, RelayConfig};
use crate::core::workflow::{ProfileService, DEFAULT_NOTIFY_TIMEOUT};
use crate::utils::error::Result;

/// 正式環境使用的組合：HTTP CRM client + HTTP 快取通知
pub type RelayService = ProfileService<HttpCrmClient<CrmConfig>, HttpCacheNotifier>;

pub fn build_service(config: &RelayConfig) -> Result<RelayService> {
    let crm = HttpCrmClient::new(config.crm.clone())?;

    let notifier = config
        .cache_notify
        .as_ref()
        .map(HttpCacheNotifier::new)
        .transpose()?;

    let notify_timeout = config
        .cache_notify
        .as_ref()
        .map(|c| c.timeout())
        .unwrap_or(DEFAULT_NOTIFY_TIMEOUT);

    if notifier.is_none() {
        tracing::info!("Cache notification disabled (no CALLER_LOOKUP_CACHE_URL)");
    }

    Ok(ProfileService::new(crm, notifier).with_notify_timeout(notify_timeout))
}

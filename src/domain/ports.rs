use crate::domain::model::{CacheNotice, ClientCreatePayload, ClientRecord, TokenGrant};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 上游 CRM 的公開 REST API
#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Client-credentials exchange against the auth endpoint.
    async fn fetch_token(&self) -> Result<TokenGrant>;

    /// Every client for the configured tenant/location.
    async fn list_clients(&self, token: &str) -> Result<Vec<ClientRecord>>;

    /// Returns the raw 2xx body; id extraction is left to the caller.
    async fn create_client(
        &self,
        token: &str,
        payload: &ClientCreatePayload,
    ) -> Result<serde_json::Value>;
}

#[async_trait]
pub trait CacheNotifier: Send + Sync {
    async fn notify(&self, notice: &CacheNotice) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn auth_url(&self) -> &str;
    fn api_url(&self) -> &str;
    fn client_id(&self) -> &str;
    fn client_secret(&self) -> &str;
    fn tenant_id(&self) -> &str;
    fn location_id(&self) -> &str;
    fn request_timeout_seconds(&self) -> Option<u64>;
}

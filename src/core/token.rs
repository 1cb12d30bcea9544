use crate::domain::model::AccessToken;
use crate::domain::ports::CrmClient;
use crate::utils::error::{RelayError, Result};
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

/// 到期前 5 分鐘就重新取得 token
pub const REFRESH_MARGIN_SECONDS: i64 = 300;
const MAX_EXPIRES_IN_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Cached bearer token for one tenant.
///
/// The slot is only locked for the read/write itself, never across the token
/// request, so concurrent callers near expiry may each fetch a token. The
/// token endpoint is idempotent, so the last writer wins.
#[derive(Debug)]
pub struct TokenProvider {
    slot: RwLock<Option<AccessToken>>,
    margin: Duration,
}

impl Default for TokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenProvider {
    pub fn new() -> Self {
        Self::with_margin(Duration::seconds(REFRESH_MARGIN_SECONDS))
    }

    pub fn with_margin(margin: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            margin,
        }
    }

    pub async fn get_token<C: CrmClient + ?Sized>(&self, crm: &C) -> Result<String> {
        if let Some(token) = self.slot.read().await.as_ref() {
            if token.is_fresh(Utc::now(), self.margin) {
                tracing::debug!("Using cached access token");
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting new access token");
        let grant = crm.fetch_token().await?;

        let value = grant
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| RelayError::UpstreamAuthError {
                message: "Authentication response did not include an access token".to_string(),
            })?;

        // 缺少 expires_in 時視為立即過期，下次呼叫會重新取得
        let expires_in = grant.expires_in.unwrap_or(0).clamp(0, MAX_EXPIRES_IN_SECONDS);
        let token = AccessToken {
            value: value.clone(),
            expires_at: Utc::now() + Duration::seconds(expires_in),
        };

        tracing::info!("🔑 Access token refreshed (expires in {}s)", expires_in);
        *self.slot.write().await = Some(token);

        Ok(value)
    }

    pub async fn cached(&self) -> Option<AccessToken> {
        self.slot.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ClientCreatePayload, ClientRecord, TokenGrant};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct GrantingCrm {
        grant: TokenGrant,
        calls: AtomicUsize,
    }

    impl GrantingCrm {
        fn new(access_token: Option<&str>, expires_in: Option<i64>) -> Self {
            Self {
                grant: TokenGrant {
                    access_token: access_token.map(str::to_string),
                    expires_in,
                },
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CrmClient for GrantingCrm {
        async fn fetch_token(&self) -> Result<TokenGrant> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let mut grant = self.grant.clone();
            grant.access_token = grant.access_token.map(|t| format!("{}-{}", t, n));
            Ok(grant)
        }

        async fn list_clients(&self, _token: &str) -> Result<Vec<ClientRecord>> {
            Ok(Vec::new())
        }

        async fn create_client(
            &self,
            _token: &str,
            _payload: &ClientCreatePayload,
        ) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    #[tokio::test]
    async fn test_token_reused_within_validity_window() {
        let crm = GrantingCrm::new(Some("tok"), Some(3600));
        let provider = TokenProvider::new();

        let first = tokio_test::assert_ok!(provider.get_token(&crm).await);
        let second = tokio_test::assert_ok!(provider.get_token(&crm).await);

        assert_eq!(first, "tok-0");
        assert_eq!(second, "tok-0");
        assert!(provider.cached().await.is_some());
        assert_eq!(crm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_token_inside_refresh_margin_is_refetched() {
        // 240 秒 < 5 分鐘的緩衝，因此每次都視為過期
        let crm = GrantingCrm::new(Some("tok"), Some(240));
        let provider = TokenProvider::new();

        let first = provider.get_token(&crm).await.unwrap();
        let second = provider.get_token(&crm).await.unwrap();

        assert_eq!(first, "tok-0");
        assert_eq!(second, "tok-1");
        assert_eq!(crm.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_access_token_is_auth_error() {
        let crm = GrantingCrm::new(None, Some(3600));
        let provider = TokenProvider::new();

        let err = provider.get_token(&crm).await.unwrap_err();
        assert!(matches!(err, RelayError::UpstreamAuthError { .. }));
        assert!(provider.cached().await.is_none());
    }
}

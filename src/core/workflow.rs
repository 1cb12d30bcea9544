use crate::core::matcher::{normalize_phone, ClientMatcher};
use crate::core::payload::{build_create_payload, extract_created_id};
use crate::core::token::TokenProvider;
use crate::domain::model::{CacheNotice, ProfileRequest, ProfileResponse};
use crate::domain::ports::{CacheNotifier, CrmClient};
use crate::utils::error::{RelayError, Result};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

pub const VALIDATION_MESSAGE: &str =
    "Please provide first_name, last_name, and either email or phone";

/// 成功流程的結果 (找到既有客戶，或建立新客戶)
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOutcome {
    pub client_id: String,
    pub client_name: String,
    pub existing: bool,
}

/// Validate -> authenticate -> lookup -> build -> create -> notify.
pub struct ProfileService<C: CrmClient, N: CacheNotifier> {
    crm: Arc<C>,
    tokens: TokenProvider,
    matcher: ClientMatcher,
    notifier: Option<Arc<N>>,
    notify_timeout: Duration,
}

impl<C: CrmClient, N: CacheNotifier + 'static> ProfileService<C, N> {
    pub fn new(crm: C, notifier: Option<N>) -> Self {
        Self {
            crm: Arc::new(crm),
            tokens: TokenProvider::new(),
            matcher: ClientMatcher,
            notifier: notifier.map(Arc::new),
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    /// Runs the whole workflow and folds every outcome into the envelope.
    /// Nothing here is surfaced as a transport-level failure.
    pub async fn create_profile(&self, request: ProfileRequest) -> ProfileResponse {
        match self.run(&request).await {
            Ok(outcome) => {
                let message = if outcome.existing {
                    "Profile already exists"
                } else {
                    "Profile created successfully"
                };
                // 上游不支援的欄位原樣回傳，方便稽核
                ProfileResponse {
                    success: true,
                    client_id: Some(outcome.client_id),
                    message: Some(message.to_string()),
                    client_name: Some(outcome.client_name),
                    existing: Some(outcome.existing),
                    date_of_birth: request.date_of_birth().map(str::to_string),
                    how_did_you_hear: request.referral_source().map(str::to_string),
                    ..Default::default()
                }
            }
            Err(RelayError::PartialSuccessUnknownId { raw }) => {
                tracing::warn!("⚠️ Create call succeeded but no client ID could be extracted");
                ProfileResponse {
                    debug: Some(raw),
                    ..ProfileResponse::failure("Client profile created but no ID returned")
                }
            }
            Err(RelayError::ValidationError { message }) => {
                tracing::info!("Rejected create request: {}", message);
                ProfileResponse::failure(message)
            }
            Err(e) => {
                if e.is_upstream() {
                    tracing::error!("❌ Create profile error: {}", e);
                } else {
                    tracing::warn!("Create profile error: {}", e);
                }
                ProfileResponse::failure(e.client_message())
            }
        }
    }

    async fn run(&self, request: &ProfileRequest) -> Result<ProfileOutcome> {
        let (first_name, last_name) = validate_request(request)?;

        let token = self.tokens.get_token(self.crm.as_ref()).await?;

        let clients = self.crm.list_clients(&token).await?;
        tracing::debug!("Fetched {} clients for lookup", clients.len());

        if let Some(existing) = self
            .matcher
            .find_match(&clients, request.email(), request.phone())
        {
            let client_id = existing.client_id().map(str::to_string).ok_or_else(|| {
                RelayError::UpstreamLookupError {
                    message: "Matched client record has no ID".to_string(),
                }
            })?;
            tracing::info!("👤 Client already exists: {}", client_id);
            return Ok(ProfileOutcome {
                client_id,
                client_name: existing.display_name(),
                existing: true,
            });
        }

        let payload = build_create_payload(first_name, last_name, request);
        let body = self.crm.create_client(&token, &payload).await?;

        let client_id =
            extract_created_id(&body).ok_or(RelayError::PartialSuccessUnknownId { raw: body })?;
        tracing::info!("✅ New client created: {}", client_id);

        if let Some(phone) = request.phone() {
            self.spawn_notify(CacheNotice {
                client_id: client_id.clone(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: request.email().map(str::to_string),
                phone: normalize_phone(phone),
            });
        }

        Ok(ProfileOutcome {
            client_id,
            client_name: format!("{} {}", first_name, last_name),
            existing: false,
        })
    }

    /// Detached: the caller never waits on it and its failure is only logged.
    fn spawn_notify(&self, notice: CacheNotice) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        let timeout = self.notify_timeout;

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, notifier.notify(&notice)).await {
                Ok(Ok(())) => tracing::debug!("Cache notified for client {}", notice.client_id),
                Ok(Err(e)) => tracing::warn!("Cache notification failed: {}", e),
                Err(_) => tracing::warn!(
                    "Cache notification timed out after {}s",
                    timeout.as_secs_f32()
                ),
            }
        });
    }
}

fn validate_request(request: &ProfileRequest) -> Result<(&str, &str)> {
    let names = request.first_name().zip(request.last_name());
    let has_contact = request.email().is_some() || request.phone().is_some();

    match names {
        Some(names) if has_contact => Ok(names),
        _ => Err(RelayError::ValidationError {
            message: VALIDATION_MESSAGE.to_string(),
        }),
    }
}

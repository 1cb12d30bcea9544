use crate::domain::model::{ClientCreatePayload, ClientListResponse, ClientRecord, TokenGrant};
use crate::domain::ports::{ConfigProvider, CrmClient};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

/// Pulls a human-readable message out of an upstream error body:
/// `error.message`, then a bare `error` string, then `message`.
pub fn upstream_message(step: &str, status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let from_body = parsed.as_ref().and_then(|json| {
        json.pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| json.get("error").and_then(Value::as_str))
            .or_else(|| json.get("message").and_then(Value::as_str))
            .map(str::to_string)
    });

    from_body.unwrap_or_else(|| format!("{} failed with status {}", step, status.as_u16()))
}

/// 讀取回應；非 2xx 時依照步驟轉成對應的錯誤
async fn read_body<F>(step: &str, response: Response, to_error: F) -> Result<String>
where
    F: Fn(String) -> RelayError,
{
    let status = response.status();
    let body = response.text().await.map_err(|e| to_error(e.to_string()))?;
    tracing::debug!("{} response status: {}", step, status);

    if !status.is_success() {
        return Err(to_error(upstream_message(step, status, &body)));
    }
    Ok(body)
}

fn auth_error(message: String) -> RelayError {
    RelayError::UpstreamAuthError { message }
}

fn lookup_error(message: String) -> RelayError {
    RelayError::UpstreamLookupError { message }
}

fn create_error(message: String) -> RelayError {
    RelayError::UpstreamCreateError { message }
}

pub struct HttpCrmClient<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> HttpCrmClient<C> {
    pub fn new(config: C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.request_timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url().trim_end_matches('/'), path)
    }

    fn scope(&self) -> [(&str, &str); 2] {
        [
            ("TenantId", self.config.tenant_id()),
            ("LocationId", self.config.location_id()),
        ]
    }
}

#[async_trait]
impl<C: ConfigProvider> CrmClient for HttpCrmClient<C> {
    async fn fetch_token(&self) -> Result<TokenGrant> {
        tracing::debug!("Making token request to: {}", self.config.auth_url());

        let response = self
            .client
            .post(self.config.auth_url())
            .json(&TokenRequest {
                client_id: self.config.client_id(),
                client_secret: self.config.client_secret(),
            })
            .send()
            .await
            .map_err(|e| auth_error(e.to_string()))?;

        let body = read_body("Authentication", response, auth_error).await?;
        serde_json::from_str(&body)
            .map_err(|e| auth_error(format!("Malformed token response: {}", e)))
    }

    async fn list_clients(&self, token: &str) -> Result<Vec<ClientRecord>> {
        let url = self.endpoint("clients");
        tracing::debug!("Making client list request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&self.scope())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| lookup_error(e.to_string()))?;

        let body = read_body("Client lookup", response, lookup_error).await?;
        let list: ClientListResponse = serde_json::from_str(&body)
            .map_err(|e| lookup_error(format!("Malformed client list: {}", e)))?;

        Ok(list.into_records())
    }

    async fn create_client(&self, token: &str, payload: &ClientCreatePayload) -> Result<Value> {
        let url = self.endpoint("client");
        tracing::debug!("Making client create request to: {}", url);

        let response = self
            .client
            .post(&url)
            .query(&self.scope())
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| create_error(e.to_string()))?;

        let body = read_body("Client creation", response, create_error).await?;

        // 2xx 但 body 不是 JSON 時，原文保留給 debug 欄位
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_prefers_nested_error() {
        let body = r#"{"error":{"message":"Invalid client credentials"},"message":"outer"}"#;
        assert_eq!(
            upstream_message("Authentication", StatusCode::UNAUTHORIZED, body),
            "Invalid client credentials"
        );
    }

    #[test]
    fn test_upstream_message_fallbacks() {
        assert_eq!(
            upstream_message("Client lookup", StatusCode::BAD_REQUEST, r#"{"error":"bad tenant"}"#),
            "bad tenant"
        );
        assert_eq!(
            upstream_message("Client lookup", StatusCode::BAD_REQUEST, r#"{"message":"nope"}"#),
            "nope"
        );
        assert_eq!(
            upstream_message("Client creation", StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "Client creation failed with status 502"
        );
    }
}

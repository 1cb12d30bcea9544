use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// 建立 profile 的請求內容 (`POST /create` body)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub how_did_you_hear: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ProfileRequest {
    pub fn first_name(&self) -> Option<&str> {
        present(&self.first_name)
    }

    pub fn last_name(&self) -> Option<&str> {
        present(&self.last_name)
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }

    pub fn phone(&self) -> Option<&str> {
        present(&self.phone)
    }

    pub fn date_of_birth(&self) -> Option<&str> {
        present(&self.date_of_birth)
    }

    pub fn referral_source(&self) -> Option<&str> {
        present(&self.how_did_you_hear)
    }
}

/// Accepts `"123"`, `123`, `null` or a missing field.
fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

/// JS 的 falsy 判斷：空字串與 0 都視為沒有 ID
pub fn id_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// 上游欄位型別不固定：字串或數字都收，其他型別視為沒有值
fn text_from_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts `3600`, `3600.0` or `"3600"`.
fn seconds_from_number_or_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    })
}

/// 上游 CRM 的客戶紀錄 (唯讀)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub client_id: Option<String>,
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: Option<String>,
    #[serde(deserialize_with = "text_from_string_or_number")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "text_from_string_or_number")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "text_from_string_or_number")]
    pub email_address: Option<String>,
    #[serde(deserialize_with = "text_from_string_or_number")]
    pub email: Option<String>,
    #[serde(deserialize_with = "text_from_string_or_number")]
    pub mobile_phone: Option<String>,
    #[serde(deserialize_with = "text_from_string_or_number")]
    pub primary_phone: Option<String>,
}

impl ClientRecord {
    /// `clientId`，舊版回應只有 `id`
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref().or(self.id.as_deref())
    }

    pub fn email(&self) -> Option<&str> {
        self.email_address.as_deref().or(self.email.as_deref())
    }

    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    /// mobilePhone 優先，其次 primaryPhone
    pub fn phones(&self) -> impl Iterator<Item = &str> {
        [self.mobile_phone.as_deref(), self.primary_phone.as_deref()]
            .into_iter()
            .flatten()
    }
}

/// `GET /clients` 可能回傳陣列，或是 `{ "data": [...] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClientListResponse {
    Wrapped { data: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

impl ClientListResponse {
    /// 無法解析的紀錄略過，不影響其他紀錄的比對
    pub fn into_records(self) -> Vec<ClientRecord> {
        let raw = match self {
            ClientListResponse::Wrapped { data } => data,
            ClientListResponse::Bare(records) => records,
        };

        raw.into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping unreadable client record #{}: {}", index, e);
                    None
                }
            })
            .collect()
    }
}

pub const PHONE_TYPE_MOBILE: u32 = 21;
pub const PHONE_COUNTRY_CODE: &str = "1";
pub const SMS_OPTED_IN_STATE: u32 = 2087;
pub const OBJECT_STATE_ACTIVE: u32 = 2026;

/// Phone entry inside the create payload. Upstream expects lower camel-case here
/// even though the enclosing object is PascalCase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberEntry {
    #[serde(rename = "type")]
    pub phone_type: u32,
    pub country_code: String,
    pub number: String,
    pub is_primary: bool,
    pub sms_comm_opted_in_state: u32,
}

impl PhoneNumberEntry {
    pub fn mobile(number: String) -> Self {
        Self {
            phone_type: PHONE_TYPE_MOBILE,
            country_code: PHONE_COUNTRY_CODE.to_string(),
            number,
            is_primary: true,
            sms_comm_opted_in_state: SMS_OPTED_IN_STATE,
        }
    }
}

/// `POST /client` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ClientCreatePayload {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(rename = "phoneNumbers", skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<PhoneNumberEntry>>,
    pub object_state: u32,
    pub online_booking_access: bool,
}

/// 快取中的 access token
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// 到期前 `margin` 內就視為失效
    pub fn is_fresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now < self.expires_at - margin
    }
}

/// Token 端點的回應
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenGrant {
    pub access_token: Option<String>,
    #[serde(deserialize_with = "seconds_from_number_or_string")]
    pub expires_in: Option<i64>,
}

/// 側邊快取服務的通知內容
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CacheNotice {
    pub client_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
}

/// `POST /create` 的回應 envelope，錯誤也用 200 回傳
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub how_did_you_hear: Option<String>,
}

impl ProfileResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

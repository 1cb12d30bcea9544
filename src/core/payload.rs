use crate::core::matcher::normalize_phone;
use crate::domain::model::{
    id_from_value, ClientCreatePayload, PhoneNumberEntry, ProfileRequest, OBJECT_STATE_ACTIVE,
};
use serde_json::Value;

/// Where a freshly created client's id may live in the upstream response,
/// tried in this order.
pub const CREATED_ID_PATHS: [&[&str]; 3] = [&["clientId"], &["data", "clientId"], &["id"]];

/// Maps a validated request onto the upstream create body.
///
/// Date of birth and referral source are not accepted upstream and are left
/// out here; the workflow echoes them in its own response instead.
pub fn build_create_payload(
    first_name: &str,
    last_name: &str,
    request: &ProfileRequest,
) -> ClientCreatePayload {
    let phone_numbers = request
        .phone()
        .map(normalize_phone)
        .filter(|digits| !digits.is_empty())
        .map(|digits| vec![PhoneNumberEntry::mobile(digits)]);

    ClientCreatePayload {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email_address: request.email().map(str::to_string),
        phone_numbers,
        object_state: OBJECT_STATE_ACTIVE,
        online_booking_access: true,
    }
}

fn lookup<'a>(body: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(body, |node, key| node.get(key))
}

pub fn extract_created_id(body: &Value) -> Option<String> {
    CREATED_ID_PATHS
        .iter()
        .find_map(|path| lookup(body, path).and_then(id_from_value))
}

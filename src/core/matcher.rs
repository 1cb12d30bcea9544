use crate::domain::model::ClientRecord;

/// 少於 7 碼的電話號碼不可靠，不參與比對
pub const MIN_PHONE_DIGITS: usize = 7;

/// Strips everything but ASCII digits: `"(555) 123-4567"` -> `"5551234567"`.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Equal, or one is a suffix of the other (country-code prefix mismatch).
fn phones_match(a: &str, b: &str) -> bool {
    a == b || a.ends_with(b) || b.ends_with(a)
}

/// Finds an existing upstream client for an inbound request.
///
/// Email wins when present: case-insensitive exact match. Phone is only
/// consulted when no email was given. First match in upstream order wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientMatcher;

impl ClientMatcher {
    pub fn find_match<'a>(
        &self,
        clients: &'a [ClientRecord],
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Option<&'a ClientRecord> {
        if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
            let wanted = email.to_lowercase();
            return clients.iter().find(|client| {
                client
                    .email()
                    .map(|candidate| candidate.trim().to_lowercase() == wanted)
                    .unwrap_or(false)
            });
        }

        let wanted = normalize_phone(phone?);
        if wanted.len() < MIN_PHONE_DIGITS {
            tracing::debug!("Phone too short for matching, skipping lookup");
            return None;
        }

        clients.iter().find(|client| {
            client
                .phones()
                .map(normalize_phone)
                .filter(|candidate| candidate.len() >= MIN_PHONE_DIGITS)
                .any(|candidate| phones_match(&candidate, &wanted))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, email: Option<&str>, mobile: Option<&str>) -> ClientRecord {
        ClientRecord {
            client_id: Some(id.to_string()),
            first_name: Some("Test".to_string()),
            last_name: Some(id.to_string()),
            email_address: email.map(str::to_string),
            mobile_phone: mobile.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("(555) 123-4567"), "5551234567");
        assert_eq!(normalize_phone("+1 555.123.4567"), "15551234567");
        assert_eq!(normalize_phone("n/a"), "");
    }

    #[test]
    fn test_email_match_is_case_insensitive() {
        let clients = vec![
            client("1", Some("other@b.com"), None),
            client("2", Some("a@b.com"), None),
        ];

        let found = ClientMatcher.find_match(&clients, Some("A@B.COM"), None);
        assert_eq!(found.and_then(|c| c.client_id()), Some("2"));
    }

    #[test]
    fn test_email_takes_precedence_over_phone() {
        let clients = vec![client("1", Some("x@y.com"), Some("5551234567"))];

        // 有 email 時不改用電話比對
        let found = ClientMatcher.find_match(&clients, Some("a@b.com"), Some("5551234567"));
        assert!(found.is_none());
    }

    #[test]
    fn test_phone_suffix_match_handles_country_code() {
        let clients = vec![
            client("1", None, Some("15559999999")),
            client("2", None, Some("15551234567")),
        ];

        let found = ClientMatcher.find_match(&clients, None, Some("(555) 123-4567"));
        assert_eq!(found.and_then(|c| c.client_id()), Some("2"));
    }

    #[test]
    fn test_primary_phone_used_when_no_mobile() {
        let mut record = client("9", None, None);
        record.primary_phone = Some("555-123-4567".to_string());

        let records = [record];
        let found = ClientMatcher.find_match(&records, None, Some("+1 (555) 123-4567"));
        assert_eq!(found.and_then(|c| c.client_id()), Some("9"));
    }

    #[test]
    fn test_short_candidate_phones_are_skipped() {
        let clients = vec![client("1", None, Some("4567")), client("2", None, Some("123-4567"))];

        let found = ClientMatcher.find_match(&clients, None, Some("5551234567"));
        assert_eq!(found.and_then(|c| c.client_id()), Some("2"));
    }

    #[test]
    fn test_short_request_phone_never_matches() {
        let clients = vec![client("1", None, Some("5550000123"))];
        assert!(ClientMatcher.find_match(&clients, None, Some("123")).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let clients = vec![
            client("first", Some("dup@b.com"), None),
            client("second", Some("dup@b.com"), None),
        ];

        let found = ClientMatcher.find_match(&clients, Some("dup@b.com"), None);
        assert_eq!(found.and_then(|c| c.client_id()), Some("first"));
    }

    #[test]
    fn test_no_contact_no_match() {
        let clients = vec![client("1", Some("a@b.com"), Some("5551234567"))];
        assert!(ClientMatcher.find_match(&clients, None, None).is_none());
        assert!(ClientMatcher.find_match(&[], Some("a@b.com"), None).is_none());
    }
}

/// Key layout for the notification partitions
///
/// Partition structure:
/// - `unconfirmed_notification_requests`: req:{email}:{secret} -> NotificationRequest (JSON)
/// - `confirmed_notification_requests`: req:{email}:{secret} -> NotificationRequest (JSON)
///
/// `email` is the hash part and `secret` the range part of the composite key.

pub const UNCONFIRMED_PARTITION: &str = "unconfirmed_notification_requests";
pub const CONFIRMED_PARTITION: &str = "confirmed_notification_requests";

/// Encode a request key: req:{email}:{secret}
pub fn encode_request_key(email: &str, secret: &str) -> Vec<u8> {
    format!("req:{}:{}", email, secret).into_bytes()
}

/// Decode a request key: req:{email}:{secret} -> (email, secret)
///
/// Splits on the last `:` since secrets are URL-safe and never contain one.
pub fn decode_request_key(key: &[u8]) -> Option<(String, String)> {
    let key_str = std::str::from_utf8(key).ok()?;
    let (email, secret) = key_str.strip_prefix("req:")?.rsplit_once(':')?;
    if email.is_empty() || secret.is_empty() {
        return None;
    }
    Some((email.to_string(), secret.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_key_encoding() {
        let key = encode_request_key("a@b.com", "tok_123-x");
        assert_eq!(key, b"req:a@b.com:tok_123-x");

        let (email, secret) = decode_request_key(&key).unwrap();
        assert_eq!(email, "a@b.com");
        assert_eq!(secret, "tok_123-x");
    }

    #[test]
    fn test_decode_rejects_malformed_keys() {
        assert!(decode_request_key(b"job:123").is_none());
        assert!(decode_request_key(b"req:no-separator").is_none());
        assert!(decode_request_key(b"req::secret").is_none());
        assert!(decode_request_key(b"req:a@b.com:").is_none());
    }
}

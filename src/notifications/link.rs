/// Marker that opens the query string of every confirmation link
pub const CONFIRMATION_PATH: &str = "confirm-notification-request";

/// Build the link mailed to a subscriber.
///
/// Shape: `https://{domain}/?confirm-notification-request?email={email}&secret={secret}`,
/// with `email` and `secret` percent-encoded and in that order.
pub fn confirmation_link(domain: &str, email: &str, secret: &str) -> String {
    format!(
        "https://{}/?{}?email={}&secret={}",
        domain.trim_end_matches('/'),
        CONFIRMATION_PATH,
        urlencoding::encode(email),
        urlencoding::encode(secret),
    )
}

/// Strip the `confirm-notification-request?` marker from a raw root query.
///
/// Returns the remaining `email=..&secret=..` part, or `None` when the query
/// does not belong to a confirmation link.
pub fn strip_confirmation_marker(raw_query: &str) -> Option<&str> {
    raw_query
        .strip_prefix(CONFIRMATION_PATH)
        .and_then(|rest| rest.strip_prefix('?'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_encodes_email() {
        let link = confirmation_link("api.example.com", "a@b.com", "some-secret-token");
        assert_eq!(
            link,
            "https://api.example.com/?confirm-notification-request?email=a%40b.com&secret=some-secret-token"
        );
    }

    #[test]
    fn test_link_encodes_reserved_characters() {
        let link = confirmation_link("api.example.com", "a+b@c.com", "x&y=z");
        assert!(link.ends_with("email=a%2Bb%40c.com&secret=x%26y%3Dz"));
    }

    #[test]
    fn test_link_trims_trailing_slash_on_domain() {
        let link = confirmation_link("api.example.com/", "a@b.com", "t");
        assert!(link.starts_with("https://api.example.com/?confirm-notification-request?"));
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(
            strip_confirmation_marker("confirm-notification-request?email=a%40b.com&secret=t"),
            Some("email=a%40b.com&secret=t")
        );
        assert_eq!(strip_confirmation_marker("email=a%40b.com"), None);
        assert_eq!(strip_confirmation_marker("confirm-notification-requests?x=1"), None);
    }

    #[test]
    fn test_link_query_round_trips_through_marker() {
        let link = confirmation_link("d", "a@b.com", "tok");
        let raw_query = link.split_once("/?").map(|(_, q)| q).unwrap();
        assert_eq!(
            strip_confirmation_marker(raw_query),
            Some("email=a%40b.com&secret=tok")
        );
    }
}

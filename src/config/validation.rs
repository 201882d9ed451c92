use super::models::Config;
use thiserror::Error;

const MAX_PAGE_SIZE: u32 = 100;

/// One year
pub const MAX_UNCONFIRMED_TTL_HOURS: u64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required option '{option}' is missing or empty")]
    MissingOption { option: &'static str },

    #[error("search.page_size must be between 1 and {max}, got {actual}")]
    InvalidPageSize { actual: u32, max: u32 },

    #[error("search.base_url must be an http(s) URL, got '{url}'")]
    InvalidSearchUrl { url: String },

    #[error("email.sender_address '{address}' is not an email address")]
    InvalidSenderAddress { address: String },

    #[error("notifications.api_domain must be a bare host name, got '{domain}'")]
    InvalidApiDomain { domain: String },

    #[error("notifications.unconfirmed_ttl_hours must be between 1 and {max}, got {actual}")]
    InvalidUnconfirmedTtl { actual: u64, max: u64 },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_search(config)?;
    validate_email(config)?;
    validate_notifications(config)?;
    Ok(())
}

fn require<'a>(value: Option<&'a str>, option: &'static str) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValidationError::MissingOption { option }),
    }
}

fn validate_search(config: &Config) -> Result<(), ValidationError> {
    let search = &config.search;

    require(search.client_id.as_deref(), "search.client_id")?;
    require(search.client_secret.as_deref(), "search.client_secret")?;

    if !search.base_url.starts_with("http://") && !search.base_url.starts_with("https://") {
        return Err(ValidationError::InvalidSearchUrl {
            url: search.base_url.clone(),
        });
    }

    if search.page_size == 0 || search.page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::InvalidPageSize {
            actual: search.page_size,
            max: MAX_PAGE_SIZE,
        });
    }

    Ok(())
}

fn validate_email(config: &Config) -> Result<(), ValidationError> {
    let sender = require(config.email.sender_address.as_deref(), "email.sender_address")?;
    require(Some(config.email.region.as_str()), "email.region")?;

    let valid = sender
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(ValidationError::InvalidSenderAddress {
            address: sender.to_string(),
        });
    }

    Ok(())
}

fn validate_notifications(config: &Config) -> Result<(), ValidationError> {
    let domain = require(
        config.notifications.api_domain.as_deref(),
        "notifications.api_domain",
    )?;

    // Links are built as https://{domain}/..., so a scheme here would double up
    if domain.contains("://") || domain.contains('?') {
        return Err(ValidationError::InvalidApiDomain {
            domain: domain.to_string(),
        });
    }

    let ttl = config.notifications.unconfirmed_ttl_hours;
    if ttl == 0 || ttl > MAX_UNCONFIRMED_TTL_HOURS {
        return Err(ValidationError::InvalidUnconfirmedTtl {
            actual: ttl,
            max: MAX_UNCONFIRMED_TTL_HOURS,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.search.client_id = Some("id".to_string());
        config.search.client_secret = Some("secret".to_string());
        config.email.sender_address = Some("alerts@example.com".to_string());
        config.notifications.api_domain = Some("api.example.com".to_string());
        config
    }

    #[test]
    fn test_valid_config() {
        let config = create_test_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_each_required_option() {
        let cases: [(fn(&mut Config), &str); 5] = [
            (|c| c.search.client_id = None, "search.client_id"),
            (|c| c.search.client_secret = Some("  ".to_string()), "search.client_secret"),
            (|c| c.email.sender_address = None, "email.sender_address"),
            (|c| c.email.region = String::new(), "email.region"),
            (|c| c.notifications.api_domain = None, "notifications.api_domain"),
        ];

        for (mutate, expected) in cases {
            let mut config = create_test_config();
            mutate(&mut config);

            match validate(&config) {
                Err(ValidationError::MissingOption { option }) => assert_eq!(option, expected),
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_page_size_bounds() {
        let mut config = create_test_config();
        config.search.page_size = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidPageSize { .. })
        ));

        config.search.page_size = 101;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidPageSize { .. })
        ));

        config.search.page_size = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_sender_address() {
        let mut config = create_test_config();
        config.email.sender_address = Some("alerts".to_string());

        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidSenderAddress { .. })
        ));
    }

    #[test]
    fn test_api_domain_with_scheme() {
        let mut config = create_test_config();
        config.notifications.api_domain = Some("https://api.example.com".to_string());

        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidApiDomain { .. })
        ));
    }

    #[test]
    fn test_invalid_search_url() {
        let mut config = create_test_config();
        config.search.base_url = "audiosear.ch".to_string();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidSearchUrl { .. })
        ));
    }

    #[test]
    fn test_ttl_bounds() {
        let mut config = create_test_config();
        config.notifications.unconfirmed_ttl_hours = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidUnconfirmedTtl { actual: 0, .. })
        ));

        config.notifications.unconfirmed_ttl_hours = MAX_UNCONFIRMED_TTL_HOURS + 1;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidUnconfirmedTtl { .. })
        ));
    }
}

//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;

/// Upper bound of the worker pool.
pub const MAX_CONCURRENCY: usize = 8;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_token(&config.account.access_token)?;
    validate_user_id(config.account.user_id)?;
    validate_concurrency(config.options.concurrency)?;

    if config.jobs().is_empty() {
        return Err(Error::MissingConfig(
            "jobs (select at least one of: bookmarks, following)".to_string(),
        ));
    }

    Ok(())
}

/// Validate an access token.
///
/// An empty token is allowed here: it is prompted for at login.
pub fn validate_token(token: &str) -> Result<()> {
    let token_lower = token.to_lowercase();
    if token_lower.contains("replaceme") || token_lower.contains("your_token") {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: "Token appears to be a placeholder. Please provide your actual access token."
                .to_string(),
        });
    }

    if token.chars().any(char::is_whitespace) {
        return Err(Error::ConfigValidation {
            field: "access_token".to_string(),
            message: "Token must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validate the account's user id.
pub fn validate_user_id(user_id: u64) -> Result<()> {
    if user_id == 0 {
        return Err(Error::MissingConfig(
            "user_id (the numeric id of your account)".to_string(),
        ));
    }
    Ok(())
}

/// Validate the worker pool size.
pub fn validate_concurrency(concurrency: usize) -> Result<()> {
    if concurrency == 0 || concurrency > MAX_CONCURRENCY {
        return Err(Error::ConfigValidation {
            field: "concurrency".to_string(),
            message: format!(
                "Concurrency must be between 1 and {} (got {})",
                MAX_CONCURRENCY, concurrency
            ),
        });
    }
    Ok(())
}

/// Extract a user id from a profile URL or a bare numeric id.
pub fn parse_user_id(input: &str) -> Result<u64> {
    let input = input.trim();

    let digits = if input.starts_with("http://") || input.starts_with("https://") {
        // Patterns: https://www.pixiv.net/users/123, .../en/users/123, member.php?id=123
        let profile_pattern = Regex::new(r"(?:/users/|member\.php\?id=)(\d+)")
            .map_err(|e| Error::Config(e.to_string()))?;

        profile_pattern
            .captures(input)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::ConfigValidation {
                field: "user_id".to_string(),
                message: format!("Could not extract user id from URL: {}", input),
            })?
    } else {
        input
    };

    match digits.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::ConfigValidation {
            field: "user_id".to_string(),
            message: format!(
                "Invalid user id: '{}'. Must be a positive number or a profile URL.",
                input
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncJob;

    #[test]
    fn test_parse_user_id_direct() {
        assert_eq!(parse_user_id("12345").unwrap(), 12345);
        assert_eq!(parse_user_id(" 12345 ").unwrap(), 12345);
    }

    #[test]
    fn test_parse_user_id_url() {
        assert_eq!(
            parse_user_id("https://www.pixiv.net/users/12345").unwrap(),
            12345
        );
        assert_eq!(
            parse_user_id("https://www.pixiv.net/en/users/678/illustrations").unwrap(),
            678
        );
        assert_eq!(
            parse_user_id("https://www.pixiv.net/member.php?id=99").unwrap(),
            99
        );
    }

    #[test]
    fn test_parse_user_id_invalid() {
        assert!(parse_user_id("0").is_err());
        assert!(parse_user_id("abc").is_err());
        assert!(parse_user_id("https://www.pixiv.net/artworks/1").is_err());
    }

    #[test]
    fn test_validate_token_placeholder() {
        assert!(validate_token("REPLACEME").is_err());
        assert!(validate_token("abc def").is_err());
        assert!(validate_token("").is_ok());
        assert!(validate_token("a1b2c3").is_ok());
    }

    #[test]
    fn test_empty_token_is_left_for_login() {
        let mut config = Config::default();
        config.account.user_id = 7;
        assert!(config.account.access_token.is_empty());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_concurrency_bounds() {
        assert!(validate_concurrency(0).is_err());
        assert!(validate_concurrency(1).is_ok());
        assert!(validate_concurrency(MAX_CONCURRENCY).is_ok());
        assert!(validate_concurrency(MAX_CONCURRENCY + 1).is_err());
    }

    #[test]
    fn test_validate_config_requires_jobs_and_user() {
        let mut config = Config::default();
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(_))
        ));

        config.account.user_id = 1;
        assert!(validate_config(&config).is_ok());

        config.options.jobs = Vec::<SyncJob>::new();
        assert!(validate_config(&config).is_err());
    }
}

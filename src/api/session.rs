//! Session establishment with a bounded number of login attempts.
//!
//! Obtaining and refreshing tokens is handled outside this crate; a
//! [`CredentialSource`] only has to hand over an access token for each
//! attempt. The token is then verified with one authenticated call.

use std::future::Future;

use console::Term;

use crate::error::{Error, Result};
use crate::output::print_error;

/// Consecutive authentication failures tolerated before giving up.
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// Supplies an access token for each login attempt.
pub trait CredentialSource {
    /// Return the token to try for `attempt` (1-based).
    fn access_token(&mut self, attempt: u32) -> Result<String>;
}

/// Uses the configured token first and prompts on the terminal afterwards.
pub struct TerminalCredentials {
    configured: Option<String>,
    term: Term,
}

impl TerminalCredentials {
    pub fn new(configured: Option<String>) -> Self {
        Self {
            configured: configured.filter(|t| !t.trim().is_empty()),
            term: Term::stderr(),
        }
    }
}

impl CredentialSource for TerminalCredentials {
    fn access_token(&mut self, _attempt: u32) -> Result<String> {
        if let Some(token) = self.configured.take() {
            return Ok(token);
        }

        if !self.term.is_term() {
            return Err(Error::MissingConfig(
                "access_token (no terminal available to prompt for it)".to_string(),
            ));
        }

        self.term.write_str("[+]Access token: ")?;
        let token = self.term.read_secure_line()?;
        Ok(token.trim().to_string())
    }
}

/// Try to log in up to [`MAX_LOGIN_ATTEMPTS`] times.
///
/// `login` receives a token and returns the authenticated session. An
/// [`Error::Authentication`] is reported and followed by another attempt;
/// any other error is returned immediately.
pub async fn establish_session<S, F, Fut, T>(source: &mut S, mut login: F) -> Result<T>
where
    S: CredentialSource + ?Sized,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    for attempt in 1..=MAX_LOGIN_ATTEMPTS {
        let token = source.access_token(attempt)?;

        match login(token).await {
            Ok(session) => return Ok(session),
            Err(Error::Authentication { code, message }) => {
                tracing::debug!("Login attempt {} rejected: {}", attempt, code);
                print_error(&format!("{} <{}>", message, code));
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::Authentication {
        code: "login_attempts_exceeded".to_string(),
        message: "The number of login attempts has been exceeded.".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedTokens {
        tokens: Vec<&'static str>,
        requested: Vec<u32>,
    }

    impl CredentialSource for FixedTokens {
        fn access_token(&mut self, attempt: u32) -> Result<String> {
            self.requested.push(attempt);
            Ok(self.tokens[(attempt - 1) as usize].to_string())
        }
    }

    fn rejected() -> Error {
        Error::Authentication {
            code: "invalid_grant".to_string(),
            message: "expired".to_string(),
        }
    }

    #[test]
    fn test_configured_token_is_used_first() {
        let mut source = TerminalCredentials::new(Some("tok".to_string()));
        assert_eq!(source.access_token(1).unwrap(), "tok");
        assert!(source.configured.is_none());
    }

    #[test]
    fn test_blank_configured_token_means_prompt() {
        let source = TerminalCredentials::new(Some("   ".to_string()));
        assert!(source.configured.is_none());
    }

    #[tokio::test]
    async fn test_succeeds_on_second_attempt() {
        let mut source = FixedTokens {
            tokens: vec!["bad", "good", "unused"],
            requested: Vec::new(),
        };

        let session = establish_session(&mut source, |token| async move {
            if token == "good" {
                Ok(token)
            } else {
                Err(rejected())
            }
        })
        .await
        .unwrap();

        assert_eq!(session, "good");
        assert_eq!(source.requested, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_three_failures_are_fatal() {
        let mut source = FixedTokens {
            tokens: vec!["a", "b", "c"],
            requested: Vec::new(),
        };
        let calls = AtomicU32::new(0);

        let result: Result<()> = establish_session(&mut source, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(rejected()) }
        })
        .await;

        assert!(matches!(
            result,
            Err(Error::Authentication { ref code, .. }) if code == "login_attempts_exceeded"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), MAX_LOGIN_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_non_auth_error_is_not_retried() {
        let mut source = FixedTokens {
            tokens: vec!["a", "b", "c"],
            requested: Vec::new(),
        };

        let result: Result<()> = establish_session(&mut source, |_| async {
            Err(Error::Network("unreachable".to_string()))
        })
        .await;

        assert!(matches!(result, Err(Error::Network(_))));
        assert_eq!(source.requested, vec![1]);
    }

    #[test]
    fn test_terminal_credentials_use_configured_token_first() {
        let mut source = TerminalCredentials::new(Some("configured".to_string()));
        assert_eq!(source.access_token(1).unwrap(), "configured");
    }
}

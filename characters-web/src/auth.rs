//! Shared-secret login and bearer token handling

pub mod handlers;
pub mod jwt;

pub use jwt::{AuthError, Claims, TokenService};

use characters_core::AuthConfig;

/// Exact, case-sensitive match against the configured credential pair
pub fn credentials_match(config: &AuthConfig, user: &str, password: &str) -> bool {
    !config.username.is_empty() && user == config.username && password == config.password
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            secret: "s".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            token_ttl_minutes: 30,
        }
    }

    #[test]
    fn test_credentials_match() {
        let config = config();
        assert!(credentials_match(&config, "admin", "secret"));
        assert!(!credentials_match(&config, "Admin", "secret"));
        assert!(!credentials_match(&config, "admin", "SECRET"));
        assert!(!credentials_match(&config, "admin ", "secret"));
        assert!(!credentials_match(&config, "", ""));
    }

    #[test]
    fn test_unset_credentials_never_match() {
        let config = AuthConfig::default();
        assert!(!credentials_match(&config, "", ""));
    }
}

//! Shared utility functions for provider adapters.

use iv_domain::config::AuthConfig;
use iv_domain::error::{Error, Result};

/// Map a transport failure onto the domain error, keeping timeouts distinct.
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// API key for a provider entry.
///
/// Tried in order: inline `key`, the OS keychain (`service` + `account`),
/// the `env` variable, then `{SERVICE}_{ACCOUNT}` for hosts without a
/// keychain daemon.
pub fn resolve_api_key(auth: &AuthConfig) -> Result<String> {
    if let Some(key) = &auth.key {
        tracing::warn!("provider API key is stored inline in the config file");
        return Ok(key.clone());
    }

    let keychain = auth.service.as_deref().zip(auth.account.as_deref());

    if let Some((service, account)) = keychain {
        match resolve_from_keychain(service, account) {
            Ok(secret) => return Ok(secret),
            Err(e) => tracing::debug!(service, account, error = %e, "keychain lookup failed"),
        }
    }

    if let Some(var) = &auth.env {
        return std::env::var(var)
            .map_err(|_| Error::Auth(format!("environment variable '{var}' is not set")));
    }

    if let Some((service, account)) = keychain {
        let var = keychain_fallback_env_name(service, account);
        if let Ok(secret) = std::env::var(&var) {
            return Ok(secret);
        }
    }

    Err(Error::Auth(
        "no API key: set auth.key, auth.env or auth.service + auth.account".into(),
    ))
}

pub fn resolve_from_keychain(service: &str, account: &str) -> Result<String> {
    keyring::Entry::new(service, account)
        .and_then(|entry| entry.get_password())
        .map_err(|e| Error::Auth(format!("keychain {service}/{account}: {e}")))
}

/// `("interview-agent", "anthropic-key")` reads `INTERVIEW_AGENT_ANTHROPIC_KEY`.
pub fn keychain_fallback_env_name(service: &str, account: &str) -> String {
    format!("{service}_{account}").to_uppercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_env_name_normalizes_case_and_hyphens() {
        assert_eq!(
            keychain_fallback_env_name("interview-agent", "anthropic-api-key"),
            "INTERVIEW_AGENT_ANTHROPIC_API_KEY"
        );
        assert_eq!(keychain_fallback_env_name("MY_SVC", "KEY"), "MY_SVC_KEY");
    }

    #[test]
    fn plaintext_key_wins() {
        let auth = AuthConfig {
            key: Some("plaintext-wins".into()),
            service: Some("interview-agent".into()),
            account: Some("some-provider".into()),
            env: Some("IV_TEST_SHOULD_NOT_BE_READ".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "plaintext-wins");
    }

    #[test]
    fn env_var_is_read() {
        let var_name = "IV_TEST_RESOLVE_ENV_KEY_5120";
        std::env::set_var(var_name, "env-secret-value");
        let auth = AuthConfig {
            env: Some(var_name.into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "env-secret-value");
        std::env::remove_var(var_name);
    }

    #[test]
    fn missing_env_var_names_the_variable() {
        let auth = AuthConfig {
            env: Some("IV_TEST_NONEXISTENT_VAR_9031".into()),
            ..Default::default()
        };
        let err = resolve_api_key(&auth).unwrap_err();
        assert!(err.to_string().contains("IV_TEST_NONEXISTENT_VAR_9031"));
    }

    #[test]
    fn nothing_configured_is_an_auth_error() {
        let err = resolve_api_key(&AuthConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn keychain_miss_falls_back_to_derived_env_var() {
        // No keychain daemon in CI, so the lookup fails and the derived
        // variable is consulted.
        let fallback_var = "IVTEST_FALLBACK_PROVIDER";
        std::env::set_var(fallback_var, "fallback-secret");
        let auth = AuthConfig {
            service: Some("ivtest".into()),
            account: Some("fallback-provider".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "fallback-secret");
        std::env::remove_var(fallback_var);
    }

    #[test]
    fn explicit_env_var_beats_derived_fallback() {
        std::env::set_var("IVTEST_ORDER_PROVIDER", "derived");
        std::env::set_var("IV_TEST_ORDER_EXPLICIT_7710", "explicit");
        let auth = AuthConfig {
            service: Some("ivtest".into()),
            account: Some("order-provider".into()),
            env: Some("IV_TEST_ORDER_EXPLICIT_7710".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "explicit");
        std::env::remove_var("IVTEST_ORDER_PROVIDER");
        std::env::remove_var("IV_TEST_ORDER_EXPLICIT_7710");
    }
}

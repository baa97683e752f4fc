use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM providers and roles
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Role names the interview runtime asks the registry for.
pub const ROLE_EVALUATOR: &str = "evaluator";
pub const ROLE_REPORTER: &str = "reporter";
pub const ROLE_QUESTIONER: &str = "questioner";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "d_60000")]
    pub default_timeout_ms: u64,
    /// Role → model assignment (`evaluator`, `reporter`, `questioner`).
    /// A role without an entry uses the first configured provider.
    #[serde(default)]
    pub roles: HashMap<String, RoleConfig>,
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: d_60000(),
            roles: HashMap::new(),
            providers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Format: "provider_id/model_name"
    pub model: String,
}

impl RoleConfig {
    /// Split into `(provider_id, model)`. A bare id selects the provider's
    /// default model.
    pub fn split(&self) -> (&str, Option<&str>) {
        match self.model.split_once('/') {
            Some((provider, model)) if !model.is_empty() => (provider, Some(model)),
            Some((provider, _)) => (provider, None),
            None => (self.model.as_str(), None),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub id: String,
    pub kind: ProviderKind,
    pub base_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub default_model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    OpenaiCompat,
    Anthropic,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
    /// Header name (e.g. "Authorization", "x-api-key").
    #[serde(default)]
    pub header: Option<String>,
    /// Header value prefix (e.g. "Bearer ").
    #[serde(default)]
    pub prefix: Option<String>,
    /// Env var containing the key.
    #[serde(default)]
    pub env: Option<String>,
    /// Inline key. Works, but logs a warning at startup.
    #[serde(default)]
    pub key: Option<String>,
    /// Keychain service name (e.g. "interview-agent").
    #[serde(default)]
    pub service: Option<String>,
    /// Keychain account name (e.g. "anthropic-api-key").
    #[serde(default)]
    pub account: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    ApiKey,
    Keychain,
    None,
}

// ── serde default helpers ───────────────────────────────────────────

fn d_60000() -> u64 {
    60_000
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_split_with_model() {
        let role = RoleConfig {
            model: "anthropic/claude-sonnet-4-20250514".into(),
        };
        assert_eq!(role.split(), ("anthropic", Some("claude-sonnet-4-20250514")));
    }

    #[test]
    fn role_split_bare_provider() {
        let role = RoleConfig { model: "local".into() };
        assert_eq!(role.split(), ("local", None));
        let role = RoleConfig { model: "local/".into() };
        assert_eq!(role.split(), ("local", None));
    }

    #[test]
    fn providers_and_roles_parse_from_toml() {
        let toml_str = r#"
            [[providers]]
            id = "anthropic"
            kind = "anthropic"
            base_url = "https://api.anthropic.com"
            default_model = "claude-sonnet-4-20250514"
            auth = { env = "ANTHROPIC_API_KEY" }

            [[providers]]
            id = "local"
            kind = "openai_compat"
            base_url = "http://localhost:11434/v1"
            auth = { mode = "none" }

            [roles.evaluator]
            model = "anthropic/claude-sonnet-4-20250514"
        "#;
        let cfg: LlmConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.providers.len(), 2);
        assert_eq!(cfg.providers[0].kind, ProviderKind::Anthropic);
        assert_eq!(cfg.providers[0].auth.env.as_deref(), Some("ANTHROPIC_API_KEY"));
        assert_eq!(cfg.providers[1].auth.mode, AuthMode::None);
        assert!(cfg.roles.contains_key(ROLE_EVALUATOR));
        assert_eq!(cfg.default_timeout_ms, 60_000);
    }
}

mod context;
mod interview;
mod llm;
mod observability;
mod server;

pub use context::*;
pub use interview::*;
pub use llm::*;
pub use observability::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub interview: InterviewConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good. Any issue with
    /// [`ConfigSeverity::Error`] should abort startup.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError::error("server.port", "port must be greater than 0"));
        }
        if self.server.host.is_empty() {
            errors.push(ConfigError::error("server.host", "host must not be empty"));
        }

        if self.llm.providers.is_empty() {
            errors.push(ConfigError::warning(
                "llm.providers",
                "no LLM providers configured (evaluation endpoints will return 503)",
            ));
        }
        for (i, provider) in self.llm.providers.iter().enumerate() {
            if provider.id.is_empty() {
                errors.push(ConfigError::error(
                    format!("llm.providers[{i}].id"),
                    "provider id must not be empty",
                ));
            }
            if provider.base_url.is_empty() {
                errors.push(ConfigError::error(
                    format!("llm.providers[{i}].base_url"),
                    "provider base_url must not be empty",
                ));
            }
        }
        for (role, cfg) in &self.llm.roles {
            if !cfg.model.contains('/') {
                errors.push(ConfigError::warning(
                    format!("llm.roles.{role}.model"),
                    "expected \"provider_id/model_name\"",
                ));
            }
        }

        // A window smaller than the two-entry compression batch can never
        // make room for the incoming exchange.
        if self.context.max_recent_exchanges < 2 {
            errors.push(ConfigError::error(
                "context.max_recent_exchanges",
                "must be at least 2",
            ));
        }
        for (field, value) in [
            ("context.max_summaries", self.context.max_summaries),
            ("context.max_key_points", self.context.max_key_points),
            ("context.summary_excerpt_chars", self.context.summary_excerpt_chars),
            ("context.digest_summaries", self.context.digest_summaries),
            ("context.digest_key_points", self.context.digest_key_points),
        ] {
            if value == 0 {
                errors.push(ConfigError::error(field, "must be greater than 0"));
            }
        }

        for (field, value) in [
            ("interview.evaluation_temperature", self.interview.evaluation_temperature),
            ("interview.report_temperature", self.interview.report_temperature),
            ("interview.question_temperature", self.interview.question_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                errors.push(ConfigError::error(field, "temperature must be within 0.0..=2.0"));
            }
        }
        if self.interview.max_output_tokens == 0 {
            errors.push(ConfigError::error(
                "interview.max_output_tokens",
                "must be greater than 0",
            ));
        }

        if self.server.cors.allowed_origins.iter().any(|o| o == "*") {
            errors.push(ConfigError::warning(
                "server.cors.allowed_origins",
                "wildcard \"*\" allows all origins (not recommended for production)",
            ));
        }

        if !(0.0..=1.0).contains(&self.observability.sample_rate) {
            errors.push(ConfigError::warning(
                "observability.sample_rate",
                "sample_rate outside 0.0..=1.0 will be clamped",
            ));
        }

        errors
    }
}

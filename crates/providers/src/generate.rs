//! The text-generation capability consumed by the interview runtime.

use std::sync::Arc;
use std::time::Instant;

use iv_domain::error::Result;
use iv_domain::trace::TraceEvent;

use crate::traits::{ChatRequest, LlmProvider};

/// A provider bound to a role and (optionally) a model.
///
/// `generate` issues exactly one request; it never retries and never
/// inspects the returned text.
#[derive(Clone)]
pub struct Generator {
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
    role: String,
}

impl Generator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: Option<String>, role: impl Into<String>) -> Self {
        Self {
            provider,
            model,
            role: role.into(),
        }
    }

    pub fn provider_id(&self) -> &str {
        self.provider.provider_id()
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub async fn generate(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let req = ChatRequest {
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
            model: self.model.clone(),
            ..ChatRequest::directive(system, user)
        };

        let started = Instant::now();
        let resp = self.provider.chat(req).await.inspect_err(|e| {
            tracing::warn!(
                provider = %self.provider.provider_id(),
                role = %self.role,
                error = %e,
                "generation request failed"
            );
        })?;

        TraceEvent::LlmRequest {
            provider: self.provider.provider_id().to_owned(),
            model: resp.model.clone(),
            role: self.role.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
            prompt_tokens: resp.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens: resp.usage.as_ref().map(|u| u.completion_tokens),
        }
        .emit();

        Ok(resp.content)
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("provider", &self.provider.provider_id())
            .field("model", &self.model)
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedProvider;
    use iv_domain::error::Error;
    use iv_domain::tool::Role;

    #[tokio::test]
    async fn generate_sends_directive_and_parameters() {
        let provider = Arc::new(ScriptedProvider::new("scripted"));
        provider.push_reply("hello");
        let gen = Generator::new(provider.clone(), Some("m-1".into()), "evaluator");

        let out = gen.generate("be terse", "hi", 256, 0.7).await.unwrap();
        assert_eq!(out, "hello");

        let seen = provider.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].text_of(Role::System), Some("be terse"));
        assert_eq!(seen[0].text_of(Role::User), Some("hi"));
        assert_eq!(seen[0].max_tokens, Some(256));
        assert_eq!(seen[0].temperature, Some(0.7));
        assert_eq!(seen[0].model.as_deref(), Some("m-1"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::new("scripted"));
        provider.push_error("quota exceeded");
        let gen = Generator::new(provider, None, "reporter");
        let err = gen.generate("s", "u", 10, 0.5).await.unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
        assert_eq!(gen.model(), "scripted-model");
    }
}

//! Provider registry.
//!
//! Instantiates every configured provider at startup and resolves the
//! interview roles (`evaluator`, `reporter`, `questioner`) to a bound
//! [`Generator`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::anthropic::AnthropicProvider;
use crate::generate::Generator;
use crate::openai_compat::OpenAiCompatProvider;
use crate::traits::LlmProvider;
use iv_domain::config::{LlmConfig, ProviderKind};
use iv_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ProviderRegistry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Holds all instantiated LLM providers and role assignments.
pub struct ProviderRegistry {
    /// Config order; the first entry backs roles without an assignment.
    order: Vec<String>,
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    /// role → (provider_id, model override)
    roles: HashMap<String, (String, Option<String>)>,
    /// Provider id → init error, for providers that were skipped.
    init_errors: Vec<(String, String)>,
}

impl ProviderRegistry {
    /// Build the registry from the application's [`LlmConfig`].
    ///
    /// Providers that fail to initialize (usually a missing API key) are
    /// logged and skipped rather than aborting startup.
    pub fn from_config(config: &LlmConfig) -> Self {
        let timeout = Duration::from_millis(config.default_timeout_ms);
        let mut registry = Self::empty();

        for pc in &config.providers {
            let result: Result<Arc<dyn LlmProvider>> = match pc.kind {
                ProviderKind::OpenaiCompat => OpenAiCompatProvider::from_config(pc, timeout)
                    .map(|p| Arc::new(p) as Arc<dyn LlmProvider>),
                ProviderKind::Anthropic => AnthropicProvider::from_config(pc, timeout)
                    .map(|p| Arc::new(p) as Arc<dyn LlmProvider>),
            };

            match result {
                Ok(provider) => {
                    tracing::info!(
                        provider_id = %pc.id,
                        kind = ?pc.kind,
                        "registered LLM provider"
                    );
                    registry.insert(provider);
                }
                Err(e) => {
                    tracing::warn!(
                        provider_id = %pc.id,
                        kind = ?pc.kind,
                        error = %e,
                        "failed to initialize LLM provider, skipping"
                    );
                    registry.init_errors.push((pc.id.clone(), e.to_string()));
                }
            }
        }

        if registry.is_empty() {
            tracing::warn!(
                "no LLM providers initialized; evaluation endpoints will fail \
                 until a provider is configured"
            );
        }

        for (role_name, role_cfg) in &config.roles {
            let (provider_id, model) = role_cfg.split();
            registry.roles.insert(
                role_name.clone(),
                (provider_id.to_owned(), model.map(str::to_owned)),
            );
        }

        registry
    }

    /// Registry over already-built providers, in the given order.
    pub fn from_providers(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        let mut registry = Self::empty();
        for provider in providers {
            registry.insert(provider);
        }
        registry
    }

    /// Assign a role to a provider (and optionally a model).
    pub fn assign_role(&mut self, role: &str, provider_id: &str, model: Option<&str>) {
        self.roles.insert(
            role.to_owned(),
            (provider_id.to_owned(), model.map(str::to_owned)),
        );
    }

    fn empty() -> Self {
        Self {
            order: Vec::new(),
            providers: HashMap::new(),
            roles: HashMap::new(),
            init_errors: Vec::new(),
        }
    }

    fn insert(&mut self, provider: Arc<dyn LlmProvider>) {
        let id = provider.provider_id().to_owned();
        if self.providers.contains_key(&id) {
            tracing::warn!(provider_id = %id, "duplicate provider id, keeping the first");
            return;
        }
        self.providers.insert(id.clone(), provider);
        self.order.push(id);
    }

    /// Look up a provider by its config id.
    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn LlmProvider>> {
        self.providers.get(provider_id).cloned()
    }

    /// Resolve a role to a generator.
    ///
    /// An assigned role whose provider failed to initialize resolves to
    /// `None`. An unassigned role falls back to the first registered
    /// provider with its default model.
    pub fn for_role(&self, role: &str) -> Option<Generator> {
        match self.roles.get(role) {
            Some((provider_id, model)) => {
                let provider = self.providers.get(provider_id)?.clone();
                Some(Generator::new(provider, model.clone(), role))
            }
            None => {
                let first = self.order.first()?;
                let provider = self.providers.get(first)?.clone();
                Some(Generator::new(provider, None, role))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered provider ids in config order.
    pub fn list_providers(&self) -> &[String] {
        &self.order
    }

    /// Providers that were configured but failed to initialize.
    pub fn init_errors(&self) -> &[(String, String)] {
        &self.init_errors
    }
}

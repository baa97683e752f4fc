use std::sync::Arc;
use std::time::Instant;

use iv_domain::config::{Config, ROLE_EVALUATOR, ROLE_QUESTIONER, ROLE_REPORTER};
use iv_providers::{Generator, ProviderRegistry};
use iv_sessions::SessionRegistry;

use crate::error::ApiError;
use crate::runtime::{QuestionGenerator, ReportSynthesizer, SessionLockMap, TurnDecisionEngine};

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub llm: Arc<ProviderRegistry>,

    // ── Session management ────────────────────────────────────────────
    pub sessions: Arc<SessionRegistry>,
    /// Serializes evaluate turns per session across the model await.
    pub session_locks: Arc<SessionLockMap>,

    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Arc<Config>, llm: Arc<ProviderRegistry>) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new(config.context)),
            session_locks: Arc::new(SessionLockMap::new()),
            started_at: Instant::now(),
            config,
            llm,
        }
    }

    fn generator(&self, role: &str) -> Result<Generator, ApiError> {
        self.llm
            .for_role(role)
            .ok_or_else(|| ApiError::NoProvider(role.to_owned()))
    }

    pub fn decision_engine(&self) -> Result<TurnDecisionEngine, ApiError> {
        Ok(TurnDecisionEngine::new(
            self.generator(ROLE_EVALUATOR)?,
            self.config.interview,
        ))
    }

    pub fn report_synthesizer(&self) -> Result<ReportSynthesizer, ApiError> {
        Ok(ReportSynthesizer::new(
            self.generator(ROLE_REPORTER)?,
            self.config.interview,
        ))
    }

    pub fn question_generator(&self) -> Result<QuestionGenerator, ApiError> {
        Ok(QuestionGenerator::new(
            self.generator(ROLE_QUESTIONER)?,
            self.config.interview,
        ))
    }
}

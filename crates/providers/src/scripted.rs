//! Deterministic in-process provider for tests.

use std::collections::VecDeque;

use parking_lot::Mutex;

use iv_domain::error::{Error, Result};
use iv_domain::tool::Usage;

use crate::traits::{ChatRequest, ChatResponse, LlmProvider};

/// Replays queued completions in order and records every request.
///
/// An exhausted script fails the call, which surfaces unexpected extra
/// requests as provider errors.
pub struct ScriptedProvider {
    id: String,
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            script: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_replies<I, S>(id: impl Into<String>, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new(id);
        for reply in replies {
            provider.push_reply(reply);
        }
        provider
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.script.lock().push_back(Ok(text.into()));
    }

    pub fn push_error(&self, message: impl Into<String>) {
        self.script.lock().push_back(Err(message.into()));
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        let model = req
            .model
            .clone()
            .unwrap_or_else(|| self.default_model().to_owned());
        self.seen.lock().push(req);

        let next = self.script.lock().pop_front();
        match next {
            Some(Ok(content)) => Ok(ChatResponse {
                usage: Some(Usage {
                    prompt_tokens: 0,
                    completion_tokens: 0,
                    total_tokens: 0,
                }),
                content,
                model,
                finish_reason: Some("stop".into()),
            }),
            Some(Err(message)) => Err(Error::Provider {
                provider: self.id.clone(),
                message,
            }),
            None => Err(Error::Provider {
                provider: self.id.clone(),
                message: "script exhausted".into(),
            }),
        }
    }

    fn provider_id(&self) -> &str {
        &self.id
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }
}

use serde::Serialize;

/// Structured trace events emitted across all interview-agent crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    SessionCreated {
        session_id: String,
    },
    SessionRemoved {
        session_id: String,
        exchanges: usize,
        summaries: usize,
    },
    ExchangeAppended {
        session_id: String,
        speaker: String,
        kind: String,
        chars: usize,
        window_len: usize,
    },
    ContextCompressed {
        session_id: String,
        question_index: u32,
        summary_chars: usize,
        summaries_retained: usize,
        evicted_oldest: bool,
    },
    KeyPointExtracted {
        session_id: String,
        keyword: String,
        snippet_chars: usize,
    },
    LlmRequest {
        provider: String,
        model: String,
        role: String,
        duration_ms: u64,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
    },
    DecisionFallback {
        response_chars: usize,
    },
    ReportFallback {
        session_id: String,
        response_chars: usize,
    },
    QuestionFallback {
        topic: String,
        difficulty: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "iv_event");
    }
}

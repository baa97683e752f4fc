use std::time::Instant;

use chrono::{DateTime, Utc};
use iv_domain::config::ContextConfig;
use iv_domain::interview::Exchange;
use iv_domain::trace::TraceEvent;
use serde::Serialize;

use crate::compress::{self, CompressedSummary, COMPRESS_BATCH, SUMMARY_KEY_POINTS};
use crate::keypoints;
use crate::render;
use crate::ring::BoundedRing;
use crate::scores::{RunningScores, ScoreMeans};

/// Bounded conversation state for one interview session.
///
/// The live window, the summary list and the key-point set are each a
/// fixed-capacity FIFO. Evaluations are folded into running totals, so the
/// whole structure stays bounded no matter how long the interview runs.
///
/// Not internally synchronized; the registry wraps each context in its own
/// mutex.
#[derive(Debug)]
pub struct SessionContext {
    session_id: String,
    limits: ContextConfig,
    recent: BoundedRing<Exchange>,
    summaries: BoundedRing<CompressedSummary>,
    key_points: BoundedRing<String>,
    scores: RunningScores,
    current_question: u32,
    created_at: DateTime<Utc>,
    started: Instant,
}

/// Size snapshot of a session context.
#[derive(Debug, Clone, Serialize)]
pub struct ContextStats {
    pub session_id: String,
    pub recent_exchanges: usize,
    pub compressed_summaries: usize,
    pub key_points: usize,
    pub evaluations: usize,
    pub current_question: u32,
    pub age_seconds: f64,
}

/// One line of the combined transcript view.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TranscriptEntry {
    Summary(SummaryMarker),
    Exchange(Exchange),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMarker {
    #[serde(rename = "type")]
    pub marker: &'static str,
    pub question_index: u32,
    pub summary: String,
    pub avg_score: f64,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, limits: ContextConfig) -> Self {
        // The window must hold at least one compression batch, or folding
        // could never make room.
        let window = limits.max_recent_exchanges.max(COMPRESS_BATCH);
        Self {
            session_id: session_id.into(),
            recent: BoundedRing::new(window),
            summaries: BoundedRing::new(limits.max_summaries),
            key_points: BoundedRing::new(limits.max_key_points),
            scores: RunningScores::default(),
            current_question: 0,
            created_at: Utc::now(),
            started: Instant::now(),
            limits,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn limits(&self) -> &ContextConfig {
        &self.limits
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn current_question(&self) -> u32 {
        self.current_question
    }

    pub fn recent(&self) -> impl DoubleEndedIterator<Item = &Exchange> + '_ {
        self.recent.iter()
    }

    pub fn summaries(&self) -> impl DoubleEndedIterator<Item = &CompressedSummary> + '_ {
        self.summaries.iter()
    }

    pub fn key_points(&self) -> impl DoubleEndedIterator<Item = &String> + '_ {
        self.key_points.iter()
    }

    pub(crate) fn summaries_ring(&self) -> &BoundedRing<CompressedSummary> {
        &self.summaries
    }

    pub(crate) fn key_points_ring(&self) -> &BoundedRing<String> {
        &self.key_points
    }

    pub fn score_means(&self) -> Option<ScoreMeans> {
        self.scores.means()
    }

    /// Record one exchange.
    ///
    /// Order matters: the key point is harvested first so a compression
    /// triggered by this append can already carry it, then the evaluation
    /// is tallied, then the two oldest live exchanges are folded if the
    /// window is full, and finally the exchange is appended.
    pub fn add_exchange(&mut self, exchange: Exchange) {
        self.harvest_key_point(&exchange.text);

        if let Some(evaluation) = &exchange.evaluation {
            self.scores.record(evaluation);
        }

        if self.recent.is_full() {
            self.compress_oldest();
        }

        let chars = exchange.text.chars().count();
        let speaker = exchange.speaker.as_str();
        let kind = exchange.kind.as_str().to_owned();
        self.recent.push(exchange);

        TraceEvent::ExchangeAppended {
            session_id: self.session_id.clone(),
            speaker: speaker.into(),
            kind,
            chars,
            window_len: self.recent.len(),
        }
        .emit();
    }

    /// Move on to the next question. The index never decreases.
    pub fn advance_question(&mut self) {
        self.current_question = self.current_question.saturating_add(1);
        tracing::debug!(
            session_id = %self.session_id,
            question = self.current_question,
            "advanced question"
        );
    }

    /// Retained summaries as markers, followed by the live window.
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        let markers = self.summaries.iter().map(|s| {
            TranscriptEntry::Summary(SummaryMarker {
                marker: "summary",
                question_index: s.question_index,
                summary: s.summary.clone(),
                avg_score: s.avg_score,
            })
        });
        let live = self.recent.iter().cloned().map(TranscriptEntry::Exchange);
        markers.chain(live).collect()
    }

    pub fn stats(&self) -> ContextStats {
        ContextStats {
            session_id: self.session_id.clone(),
            recent_exchanges: self.recent.len(),
            compressed_summaries: self.summaries.len(),
            key_points: self.key_points.len(),
            evaluations: self.scores.count(),
            current_question: self.current_question,
            age_seconds: self.started.elapsed().as_secs_f64(),
        }
    }

    /// Bounded text digest for the next generation call.
    pub fn render(&self) -> String {
        render::render_digest(self)
    }

    // ── internals ─────────────────────────────────────────────────────

    fn harvest_key_point(&mut self, text: &str) {
        let Some(hit) = keypoints::scan(text) else {
            return;
        };
        if self.key_points.contains(&hit.snippet) {
            return;
        }
        let snippet_chars = hit.snippet.chars().count();
        self.key_points.push(hit.snippet);

        TraceEvent::KeyPointExtracted {
            session_id: self.session_id.clone(),
            keyword: hit.keyword.into(),
            snippet_chars,
        }
        .emit();
    }

    fn compress_oldest(&mut self) {
        let batch: Vec<Exchange> = (0..COMPRESS_BATCH)
            .filter_map(|_| self.recent.pop_front())
            .collect();
        if batch.is_empty() {
            return;
        }

        let carried: Vec<String> = self.key_points.latest(SUMMARY_KEY_POINTS).cloned().collect();
        let summary = compress::fold(
            &batch,
            self.current_question,
            carried,
            self.limits.summary_excerpt_chars,
        );
        let summary_chars = summary.summary.chars().count();
        let evicted = self.summaries.push(summary);

        TraceEvent::ContextCompressed {
            session_id: self.session_id.clone(),
            question_index: self.current_question,
            summary_chars,
            summaries_retained: self.summaries.len(),
            evicted_oldest: evicted.is_some(),
        }
        .emit();
    }
}

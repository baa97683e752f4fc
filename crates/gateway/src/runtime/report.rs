//! Final report synthesis.
//!
//! Scores are computed deterministically from the transcript and integrity
//! log; the model contributes only strengths, weaknesses and a
//! recommendation, with a fixed neutral fallback when its reply is unusable.

use chrono::Utc;
use serde::Deserialize;

use iv_contextpack::truncation::preview;
use iv_domain::config::InterviewConfig;
use iv_domain::error::Result;
use iv_domain::interview::{
    Dimension, DimensionScores, Exchange, IntegrityEvent, Recommendation, Report, SessionRecord,
};
use iv_domain::trace::TraceEvent;
use iv_providers::Generator;

use super::parse::{lenient, lenient_strings, parse_structured};

/// Integrity score with no recorded events.
pub const INTEGRITY_MAX: f64 = 100.0;

pub const FALLBACK_STRENGTH: &str = "Completed the interview";
pub const FALLBACK_WEAKNESS: &str = "Needs more practice";

const LOG_PREVIEW_CHARS: usize = 500;

const SYSTEM_DIRECTIVE: &str = "You are an experienced hiring analyst reviewing a technical interview.\n\
\n\
From the interview data, provide:\n\
1. Two or three key strengths\n\
2. Two or three areas for improvement\n\
3. A hiring recommendation: strong_hire, hire, maybe, or no_hire\n\
\n\
Weigh technical performance together with any integrity issues.\n\
\n\
Return ONLY a JSON object:\n\
{\"strengths\": [\"...\"], \"weaknesses\": [\"...\"], \"recommendation\": \"hire\"}\n";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Synthesizer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct ReportSynthesizer {
    generator: Generator,
    settings: InterviewConfig,
}

impl ReportSynthesizer {
    pub fn new(generator: Generator, settings: InterviewConfig) -> Self {
        Self { generator, settings }
    }

    pub async fn synthesize(&self, session: &SessionRecord) -> Result<Report> {
        let scores = aggregate_scores(&session.transcript);
        let overall = round2(scores.mean());
        let integrity = integrity_score(&session.integrity_events);

        let user = summary_message(session, &scores, overall);
        let raw = self
            .generator
            .generate(
                SYSTEM_DIRECTIVE,
                &user,
                self.settings.max_output_tokens,
                self.settings.report_temperature,
            )
            .await?;
        let analysis = interpret(&session.id, &raw);

        tracing::info!(
            session_id = %session.id,
            overall_score = overall,
            integrity_score = integrity,
            recommendation = ?analysis.recommendation,
            "report generated"
        );

        Ok(Report {
            session_id: session.id.clone(),
            candidate_name: session.candidate_name.clone(),
            topic: session.topic.clone(),
            difficulty: session.difficulty.clone(),
            duration: session.duration,
            questions_asked: session.questions.len(),
            overall_score: overall,
            scores,
            strengths: analysis.strengths,
            weaknesses: analysis.weaknesses,
            integrity_score: integrity,
            integrity_issues: session.integrity_events.len(),
            recommendation: analysis.recommendation,
            generated_at: Utc::now(),
        })
    }
}

fn summary_message(session: &SessionRecord, scores: &DimensionScores, overall: f64) -> String {
    let dims = Dimension::ALL
        .iter()
        .map(|d| format!("{}: {:.2}", d.key(), scores.get(*d)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Interview summary:\n\
         - Topic: {}\n\
         - Difficulty: {}\n\
         - Overall score: {overall:.2}/5\n\
         - Questions asked: {}\n\
         - Integrity issues: {}\n\
         - Scores: {dims}\n\
         \n\
         Transcript length: {} turns\n",
        session.topic,
        session.difficulty,
        session.questions.len(),
        session.integrity_events.len(),
        session.transcript.len(),
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scoring
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-dimension averages over every evaluated turn.
///
/// A turn that was evaluated but lacks a sub-score contributes 0 to that
/// dimension. With no evaluated turns every dimension is 0.0. Each average
/// is rounded to two decimals.
pub fn aggregate_scores(transcript: &[Exchange]) -> DimensionScores {
    let evaluations: Vec<_> = transcript.iter().filter_map(|e| e.evaluation.as_ref()).collect();
    let mut scores = DimensionScores::default();
    if evaluations.is_empty() {
        return scores;
    }
    let count = evaluations.len() as f64;
    for dim in Dimension::ALL {
        let sum: f64 = evaluations
            .iter()
            .map(|ev| ev.score(dim).map(f64::from).unwrap_or(0.0))
            .sum();
        scores.set(dim, round2(sum / count));
    }
    scores
}

/// 100 minus each event's severity deduction, floored at zero.
pub fn integrity_score(events: &[IntegrityEvent]) -> f64 {
    let deducted: f64 = events.iter().map(IntegrityEvent::deduction).sum();
    (INTEGRITY_MAX - deducted).max(0.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Qualitative analysis
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendation: Recommendation,
}

impl Analysis {
    pub fn fallback() -> Self {
        Self {
            strengths: vec![FALLBACK_STRENGTH.to_owned()],
            weaknesses: vec![FALLBACK_WEAKNESS.to_owned()],
            recommendation: Recommendation::Maybe,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawAnalysis {
    #[serde(default, deserialize_with = "lenient_strings")]
    strengths: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    weaknesses: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    recommendation: Option<String>,
}

/// Map raw model output to an analysis. Never fails.
pub fn interpret(session_id: &str, raw: &str) -> Analysis {
    match parse_structured::<RawAnalysis>(raw) {
        Some((parsed, _)) => Analysis {
            strengths: parsed.strengths.unwrap_or_default(),
            weaknesses: parsed.weaknesses.unwrap_or_default(),
            recommendation: parsed
                .recommendation
                .as_deref()
                .and_then(Recommendation::parse)
                .unwrap_or(Recommendation::Maybe),
        },
        None => {
            tracing::warn!(
                session_id = %session_id,
                raw = %preview(raw, LOG_PREVIEW_CHARS),
                "failed to parse report analysis, using fallback"
            );
            TraceEvent::ReportFallback {
                session_id: session_id.to_owned(),
                response_chars: raw.chars().count(),
            }
            .emit();
            Analysis::fallback()
        }
    }
}

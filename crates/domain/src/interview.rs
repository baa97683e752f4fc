//! Interview data model shared by the context pack, the session registry and
//! the gateway runtime.
//!
//! Wire shapes are camelCase (`edgeCases`, `nextAction`, `aiResponse`) to
//! match the interview front-end and backend payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Lowest and highest legal sub-score.
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Neutral mid-point used whenever a sub-score is missing mid-interview.
pub const NEUTRAL_SCORE: u8 = 3;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Speakers and exchange kinds
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The model side of the conversation. The backend sends `"ai"`.
    #[serde(alias = "ai")]
    Interviewer,
    Candidate,
}

impl Speaker {
    /// Role label used in rendered digests.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Interviewer => "Interviewer",
            Self::Candidate => "Candidate",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interviewer => "interviewer",
            Self::Candidate => "candidate",
        }
    }
}

/// Open-ended exchange tag. The four well-known kinds get their own
/// variants; anything else is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExchangeKind {
    #[default]
    Message,
    Answer,
    FollowUp,
    Greeting,
    Other(String),
}

impl ExchangeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Message => "message",
            Self::Answer => "answer",
            Self::FollowUp => "follow_up",
            Self::Greeting => "greeting",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

impl From<String> for ExchangeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "message" => Self::Message,
            "answer" => Self::Answer,
            "follow_up" => Self::FollowUp,
            "greeting" => Self::Greeting,
            _ => Self::Other(tag),
        }
    }
}

impl From<ExchangeKind> for String {
    fn from(kind: ExchangeKind) -> Self {
        match kind {
            ExchangeKind::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Evaluation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The four scored dimensions, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Correctness,
    Communication,
    Approach,
    EdgeCases,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Correctness,
        Dimension::Communication,
        Dimension::Approach,
        Dimension::EdgeCases,
    ];

    /// Wire key (`edgeCases` is camelCase on the wire).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Correctness => "correctness",
            Self::Communication => "communication",
            Self::Approach => "approach",
            Self::EdgeCases => "edgeCases",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Correctness => "Correctness",
            Self::Communication => "Communication",
            Self::Approach => "Approach",
            Self::EdgeCases => "Edge Cases",
        }
    }
}

/// A structured evaluation of one candidate turn.
///
/// Every sub-score is optional: models regularly omit fields, and absence is
/// handled by the consumer (neutral mid-point mid-interview, omission in the
/// final report). Present values are always clamped into `1..=5`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub correctness: Option<u8>,
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub communication: Option<u8>,
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub approach: Option<u8>,
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub edge_cases: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Evaluation {
    /// An evaluation with all four sub-scores set.
    pub fn scored(correctness: u8, communication: u8, approach: u8, edge_cases: u8) -> Self {
        Self {
            correctness: Some(clamp_score(correctness)),
            communication: Some(clamp_score(communication)),
            approach: Some(clamp_score(approach)),
            edge_cases: Some(clamp_score(edge_cases)),
            notes: None,
        }
    }

    /// Every sub-score at the neutral mid-point.
    pub fn neutral(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Self::scored(NEUTRAL_SCORE, NEUTRAL_SCORE, NEUTRAL_SCORE, NEUTRAL_SCORE)
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn score(&self, dim: Dimension) -> Option<u8> {
        match dim {
            Dimension::Correctness => self.correctness,
            Dimension::Communication => self.communication,
            Dimension::Approach => self.approach,
            Dimension::EdgeCases => self.edge_cases,
        }
    }

    /// Sub-score with the neutral mid-point substituted for absence.
    pub fn score_or_neutral(&self, dim: Dimension) -> f64 {
        f64::from(self.score(dim).unwrap_or(NEUTRAL_SCORE))
    }

    /// Mean of the four sub-scores, absent ones counted as neutral.
    pub fn mean_or_neutral(&self) -> f64 {
        Dimension::ALL
            .iter()
            .map(|d| self.score_or_neutral(*d))
            .sum::<f64>()
            / Dimension::ALL.len() as f64
    }
}

fn clamp_score(score: u8) -> u8 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Accepts integers, floats and numeric strings; anything else reads as
/// absent rather than failing the whole record.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(score_from_value))
}

fn score_from_value(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Exchange
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One conversational turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub speaker: Speaker,
    pub text: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    #[serde(default, rename = "type")]
    pub kind: ExchangeKind,
}

impl Exchange {
    pub fn new(speaker: Speaker, text: impl Into<String>, kind: ExchangeKind) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
            evaluation: None,
            kind,
        }
    }

    pub fn interviewer(text: impl Into<String>) -> Self {
        Self::new(Speaker::Interviewer, text, ExchangeKind::Message)
    }

    pub fn candidate(text: impl Into<String>) -> Self {
        Self::new(Speaker::Candidate, text, ExchangeKind::Answer)
    }

    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turn decision
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    FollowUp,
    NextQuestion,
    EndInterview,
}

impl NextAction {
    /// Parse a model-supplied tag; unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "follow_up" | "follow-up" | "followup" => Some(Self::FollowUp),
            "next_question" | "next-question" => Some(Self::NextQuestion),
            "end_interview" | "end-interview" => Some(Self::EndInterview),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FollowUp => "follow_up",
            Self::NextQuestion => "next_question",
            Self::EndInterview => "end_interview",
        }
    }
}

/// Outcome of evaluating one candidate answer. Not stored by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnDecision {
    pub evaluation: Option<Evaluation>,
    pub next_action: NextAction,
    pub ai_response: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Questions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: String,
    pub stem: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub follow_ups: Vec<String>,
    #[serde(default)]
    pub evaluation_hints: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub asked: bool,
    #[serde(default)]
    pub asked_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn new(stem: impl Into<String>, difficulty: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            stem: stem.into(),
            difficulty: difficulty.into(),
            follow_ups: Vec::new(),
            evaluation_hints: Vec::new(),
            red_flags: Vec::new(),
            asked: false,
            asked_at: None,
        }
    }

    /// Ice-breaker questions get a short acknowledgement instead of scoring
    /// pressure.
    pub fn is_introduction(&self) -> bool {
        self.difficulty.eq_ignore_ascii_case("introduction")
            || self.stem.to_lowercase().contains("introduce yourself")
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Integrity
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Severity assigned to a proctoring signal when it is first reported.
    pub fn for_event_type(event_type: &str) -> Self {
        match event_type {
            "MULTIPLE_FACES" | "POSSIBLE_BACKGROUND_SPEECH" => Self::High,
            "TAB_SWITCH" | "WINDOW_BLUR" | "SUDDEN_AUDIO_SPIKE" => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Points removed from the integrity score.
    pub fn deduction(&self) -> f64 {
        match self {
            Self::High => 20.0,
            Self::Medium => 10.0,
            Self::Low => 5.0,
        }
    }
}

/// An externally reported suspicious-behaviour signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityEvent {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, rename = "type")]
    pub event_type: String,
    /// Raw severity label; unknown or missing labels deduct as `low`.
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
}

impl IntegrityEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        let event_type = event_type.into();
        let severity = Severity::for_event_type(&event_type);
        Self {
            timestamp: Some(Utc::now()),
            event_type,
            severity: Some(format!("{severity:?}").to_lowercase()),
            metadata: serde_json::Map::new(),
        }
    }

    pub fn deduction(&self) -> f64 {
        self.severity
            .as_deref()
            .and_then(Severity::from_label)
            .unwrap_or(Severity::Low)
            .deduction()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session record and report
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Everything the report synthesizer needs about a finished interview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub difficulty: String,
    /// Planned duration in minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub transcript: Vec<Exchange>,
    #[serde(default)]
    pub integrity_events: Vec<IntegrityEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongHire,
    Hire,
    Maybe,
    NoHire,
}

impl Recommendation {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "strong_hire" => Some(Self::StrongHire),
            "hire" => Some(Self::Hire),
            "maybe" => Some(Self::Maybe),
            "no_hire" => Some(Self::NoHire),
            _ => None,
        }
    }
}

/// Per-dimension averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScores {
    pub correctness: f64,
    pub communication: f64,
    pub approach: f64,
    pub edge_cases: f64,
}

impl DimensionScores {
    pub fn get(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::Correctness => self.correctness,
            Dimension::Communication => self.communication,
            Dimension::Approach => self.approach,
            Dimension::EdgeCases => self.edge_cases,
        }
    }

    pub fn set(&mut self, dim: Dimension, value: f64) {
        match dim {
            Dimension::Correctness => self.correctness = value,
            Dimension::Communication => self.communication = value,
            Dimension::Approach => self.approach = value,
            Dimension::EdgeCases => self.edge_cases = value,
        }
    }

    pub fn mean(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum::<f64>() / Dimension::ALL.len() as f64
    }
}

/// The final scored interview report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub session_id: String,
    pub candidate_name: String,
    pub topic: String,
    pub difficulty: String,
    pub duration: u32,
    pub questions_asked: usize,
    pub overall_score: f64,
    pub scores: DimensionScores,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub integrity_score: f64,
    pub integrity_issues: usize,
    pub recommendation: Recommendation,
    pub generated_at: DateTime<Utc>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

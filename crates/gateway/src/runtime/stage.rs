//! Conversation-stage classification for a single question.
//!
//! The stage is advisory: it is passed to the evaluator as context and never
//! gates what the model may decide.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use iv_domain::interview::{Exchange, ExchangeKind};

/// Answers shorter than this that contain `?` read as clarifying questions.
pub const CLARIFYING_MAX_CHARS: usize = 200;

/// Answer/follow-up turns after which the sub-dialogue is wrapping up.
pub const WRAP_UP_TURNS: usize = 3;

const CODE_FENCE: &str = "```";

/// Keyword-style substrings that almost never occur in plain prose.
const CODE_KEYWORDS: &[&str] = &[
    "def ",
    "fn ",
    "func ",
    "public static",
    "#include",
    "=>",
    "->",
    "&&",
    "||",
    "!=",
    "==",
];

/// Assignment, indexing, declaration, and call-with-block shapes.
const CODE_PATTERNS: &[&str] = &[
    r"\b[A-Za-z_]\w*\s*(?:\+|-|\*|/)?=\s*[^=\s]",
    r"\b[A-Za-z_]\w*\[[^\]]*\]",
    r"\b(?:function|class)\s+\w+\s*[({:]",
    r"\b(?:for|while|if)\s*\(.*\)",
    r"\)\s*\{",
    r"\breturn\b[^.\n]*;",
];

static CODE_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    CODE_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    InitialResponse,
    ClarifyingQuestion,
    ApproachDiscussion,
    CodeSubmission,
    WrappingUp,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialResponse => "initial_response",
            Self::ClarifyingQuestion => "clarifying_question",
            Self::ApproachDiscussion => "approach_discussion",
            Self::CodeSubmission => "code_submission",
            Self::WrappingUp => "wrapping_up",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer where the sub-dialogue for the current question stands.
///
/// `history` holds the prior turns for this question only, oldest first.
pub fn classify(answer: &str, history: &[Exchange]) -> Stage {
    if answer.contains('?') && answer.chars().count() < CLARIFYING_MAX_CHARS {
        return Stage::ClarifyingQuestion;
    }
    if looks_like_code(answer) {
        return Stage::CodeSubmission;
    }
    if history.is_empty() {
        return Stage::InitialResponse;
    }
    let turns = history
        .iter()
        .filter(|e| matches!(e.kind, ExchangeKind::Answer | ExchangeKind::FollowUp))
        .count();
    if turns < WRAP_UP_TURNS {
        Stage::ApproachDiscussion
    } else {
        Stage::WrappingUp
    }
}

/// True when the answer carries a fenced code block.
pub fn has_code_fence(text: &str) -> bool {
    text.contains(CODE_FENCE)
}

/// Fenced block, keyword-style token, or assignment/bracket shape.
pub fn looks_like_code(text: &str) -> bool {
    has_code_fence(text)
        || CODE_KEYWORDS.iter().any(|kw| text.contains(kw))
        || CODE_REGEXES.iter().any(|re| re.is_match(text))
}

//! Turn decision engine.
//!
//! Turns one candidate answer into an evaluation plus the interviewer's
//! next move. Exactly one generation call per decision; malformed output is
//! normalized into a fixed fallback, while provider failures propagate.

use serde::Deserialize;

use iv_contextpack::truncation::preview;
use iv_domain::config::InterviewConfig;
use iv_domain::error::Result;
use iv_domain::interview::{Evaluation, Exchange, NextAction, Question, TurnDecision};
use iv_domain::trace::TraceEvent;
use iv_providers::Generator;

use super::parse::{lenient, parse_structured};
use super::stage::{self, Stage};

/// Note attached to the neutral evaluation when the model output is unusable.
pub const FALLBACK_NOTE: &str = "unable to parse evaluation";

/// Reply used when the model output is unusable.
pub const FALLBACK_RESPONSE: &str =
    "Thanks. I want to make sure I follow your reasoning. Could you walk me through your approach once more, step by step?";

/// Reply used when a parsed record omits `aiResponse`.
pub const DEFAULT_RESPONSE: &str = "Thank you for your answer.";

/// Characters of raw model output kept in parse-failure logs.
const LOG_PREVIEW_CHARS: usize = 500;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Engine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct TurnDecisionEngine {
    generator: Generator,
    settings: InterviewConfig,
}

impl TurnDecisionEngine {
    pub fn new(generator: Generator, settings: InterviewConfig) -> Self {
        Self { generator, settings }
    }

    /// Evaluate `answer` against `question` given this question's prior
    /// turns. Does not touch any session state.
    pub async fn decide(
        &self,
        question: &Question,
        answer: &str,
        history: &[Exchange],
    ) -> Result<TurnDecision> {
        self.decide_with_digest(question, answer, history, None).await
    }

    /// Like [`decide`](Self::decide), with a rendered session digest placed
    /// in the directive as conversation context.
    pub async fn decide_with_digest(
        &self,
        question: &Question,
        answer: &str,
        history: &[Exchange],
        digest: Option<&str>,
    ) -> Result<TurnDecision> {
        let stage = stage::classify(answer, history);
        let system = build_directive(question, answer, stage, digest);
        let user = format!("Candidate's answer: {answer}");

        tracing::debug!(
            question_id = %question.id,
            stage = %stage,
            digest_chars = digest.map(str::len).unwrap_or(0),
            "evaluating answer"
        );

        let raw = self
            .generator
            .generate(
                &system,
                &user,
                self.settings.max_output_tokens,
                self.settings.evaluation_temperature,
            )
            .await?;

        Ok(interpret(&raw))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Directive
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Assemble the system directive for one evaluation call.
pub fn build_directive(
    question: &Question,
    answer: &str,
    stage: Stage,
    digest: Option<&str>,
) -> String {
    let introduction = question.is_introduction();
    let has_code = stage::has_code_fence(answer);
    let level = if question.difficulty.is_empty() {
        "technical"
    } else {
        question.difficulty.as_str()
    };

    let mut out = String::with_capacity(2048);
    out.push_str(&format!(
        "You are a technical interviewer running a {level} level interview.\n\n"
    ));
    out.push_str(
        "## Persona\n\
         - Professional and warm; patient with pauses.\n\
         - Ask for clarification when an answer is ambiguous.\n\
         - Never hand over the solution.\n\
         - Review spoken reasoning and any code with equal care.\n",
    );
    if introduction {
        out.push_str("- This is an introduction: keep it short, acknowledge, then move on.\n");
    }

    out.push_str(&format!("\n## Current Question\n{}\n", question.stem));
    if !question.evaluation_hints.is_empty() {
        out.push_str(&format!(
            "\n## Evaluation Hints\n{}\n",
            question.evaluation_hints.join(", ")
        ));
    }
    out.push_str(&format!("\n## Conversation Stage\n{stage}\n"));

    if let Some(digest) = digest.filter(|d| !d.trim().is_empty()) {
        out.push_str(&format!("\n## Conversation Context\n{digest}\n"));
    }

    out.push_str(
        "\n## Evaluation Criteria (score each 1-5)\n\
         - correctness: is the answer right; does the code work?\n\
         - communication: is the explanation clear; is the code readable?\n\
         - approach: is the problem solving systematic and the algorithm sound?\n\
         - edgeCases: are boundary conditions handled?\n",
    );

    if has_code {
        out.push_str(
            "\n## Code Review Focus\n\
             - Syntax and logic errors\n\
             - Time and space complexity\n\
             - Edge-case handling\n\
             - Readability and style\n",
        );
    }

    out.push_str("\n## Decision Rules\n");
    if introduction {
        out.push_str("- Acknowledge briefly and use nextAction \"next_question\".\n");
    } else {
        out.push_str(
            "- Unclear explanation: ask for clarification (follow_up).\n\
             - Weak correctness: offer a hint (follow_up).\n\
             - Buggy code: point it out gently and ask for a fix (follow_up).\n\
             - Strong answer: probe optimization or move on (next_question).\n\
             - At most two follow-ups per question.\n",
        );
    }

    out.push_str(
        "\nReturn ONLY a JSON object, with no text before or after it:\n\
         {\n  \"evaluation\": {\"correctness\": 1-5, \"communication\": 1-5, \"approach\": 1-5, \"edgeCases\": 1-5, \"notes\": \"...\"},\n  \
         \"nextAction\": \"follow_up\" | \"next_question\" | \"end_interview\",\n  \
         \"aiResponse\": \"your conversational reply to the candidate\"\n}\n",
    );
    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Interpretation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDecision {
    #[serde(default, deserialize_with = "lenient")]
    evaluation: Option<Evaluation>,
    #[serde(default, deserialize_with = "lenient")]
    next_action: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    ai_response: Option<String>,
}

/// Map raw model output to a decision. Never fails.
pub fn interpret(raw: &str) -> TurnDecision {
    match parse_structured::<RawDecision>(raw) {
        Some((parsed, _)) => TurnDecision {
            evaluation: parsed.evaluation,
            next_action: parsed
                .next_action
                .as_deref()
                .and_then(NextAction::parse)
                .unwrap_or(NextAction::NextQuestion),
            ai_response: parsed
                .ai_response
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_RESPONSE.to_owned()),
        },
        None => {
            tracing::warn!(
                raw = %preview(raw, LOG_PREVIEW_CHARS),
                "failed to parse evaluation response, using fallback decision"
            );
            TraceEvent::DecisionFallback {
                response_chars: raw.chars().count(),
            }
            .emit();
            fallback_decision()
        }
    }
}

/// Neutral scores and a clarifying follow-up.
pub fn fallback_decision() -> TurnDecision {
    TurnDecision {
        evaluation: Some(Evaluation::neutral(FALLBACK_NOTE)),
        next_action: NextAction::FollowUp,
        ai_response: FALLBACK_RESPONSE.to_owned(),
    }
}

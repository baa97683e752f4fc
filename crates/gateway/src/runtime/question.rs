//! Interview question generation.

use serde::Deserialize;

use iv_domain::config::InterviewConfig;
use iv_domain::error::Result;
use iv_domain::interview::Question;
use iv_domain::trace::TraceEvent;
use iv_providers::Generator;

use super::parse::{lenient, lenient_strings, parse_structured};

/// Target difficulty for the question at `position` (zero-based).
pub fn target_difficulty(position: u32) -> &'static str {
    match position {
        0 => "easy",
        1 => "medium",
        _ => "hard",
    }
}

pub struct QuestionGenerator {
    generator: Generator,
    settings: InterviewConfig,
}

impl QuestionGenerator {
    pub fn new(generator: Generator, settings: InterviewConfig) -> Self {
        Self { generator, settings }
    }

    /// Produce one question for `topic`. `difficulty` is the candidate's
    /// level; the question's own difficulty follows `position`.
    pub async fn generate(&self, topic: &str, difficulty: &str, position: u32) -> Result<Question> {
        let target = target_difficulty(position);
        let system = format!(
            "You are an experienced technical interviewer writing questions for {topic} interviews.\n\
             Write ONE practical, real-world interview question for a {difficulty} level candidate.\n\
             The question itself should be {target} difficulty.\n\
             \n\
             Return ONLY a JSON object:\n\
             {{\"stem\": \"the question\", \"followUps\": [\"...\"], \"evaluationHints\": [\"...\"], \"redFlags\": [\"...\"]}}\n"
        );
        let user = format!("Generate a {target} {topic} question for position {position} in the interview.");

        let raw = self
            .generator
            .generate(
                &system,
                &user,
                self.settings.max_output_tokens,
                self.settings.question_temperature,
            )
            .await?;

        Ok(interpret(topic, target, &raw))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default, deserialize_with = "lenient")]
    stem: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    follow_ups: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    evaluation_hints: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    red_flags: Option<Vec<String>>,
}

/// Map raw model output to a question, falling back when no usable stem
/// comes back.
pub fn interpret(topic: &str, target: &str, raw: &str) -> Question {
    let parsed = parse_structured::<RawQuestion>(raw)
        .map(|(q, _)| q)
        .filter(|q| q.stem.as_deref().is_some_and(|s| !s.trim().is_empty()));

    match parsed {
        Some(q) => Question {
            follow_ups: q.follow_ups.unwrap_or_default(),
            evaluation_hints: q.evaluation_hints.unwrap_or_default(),
            red_flags: q.red_flags.unwrap_or_default(),
            ..Question::new(q.stem.unwrap_or_default(), target)
        },
        None => {
            tracing::warn!(topic = %topic, difficulty = %target, "question generation unparseable, using fallback");
            TraceEvent::QuestionFallback {
                topic: topic.to_owned(),
                difficulty: target.to_owned(),
            }
            .emit();
            fallback_question(target)
        }
    }
}

/// The canned two-sum question, with a fresh id.
pub fn fallback_question(difficulty: &str) -> Question {
    Question {
        follow_ups: vec![
            "What's the time complexity?".into(),
            "Can you optimize space usage?".into(),
        ],
        evaluation_hints: vec!["Hash map approach".into(), "Two-pointer technique".into()],
        red_flags: vec!["Nested loops without optimization discussion".into()],
        ..Question::new(
            "Given an array of integers, find two numbers that add up to a specific target.",
            difficulty,
        )
    }
}

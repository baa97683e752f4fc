use iv_domain::interview::{Dimension, Exchange};
use serde::Serialize;

use crate::truncation::excerpt;

/// Exchanges folded per compression.
pub const COMPRESS_BATCH: usize = 2;
/// Key points carried into each summary.
pub const SUMMARY_KEY_POINTS: usize = 3;

const SEPARATOR: &str = " | ";

/// A lossy fold of the oldest live exchanges. The raw text is gone once
/// this exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedSummary {
    pub question_index: u32,
    pub summary: String,
    /// Mean four-dimension score of the folded exchanges that carried an
    /// evaluation (missing dimension = 3); 0.0 when none did.
    pub avg_score: f64,
    pub key_points: Vec<String>,
}

/// Fold `batch` (oldest first) into a summary.
pub fn fold(
    batch: &[Exchange],
    question_index: u32,
    key_points: Vec<String>,
    excerpt_chars: usize,
) -> CompressedSummary {
    CompressedSummary {
        question_index,
        summary: summarize(batch, excerpt_chars),
        avg_score: avg_score(batch),
        key_points,
    }
}

/// `excerpt | excerpt [| [Score: x.x/5]]`.
///
/// The score annotation is the mean correctness over evaluated exchanges
/// and only appears when at least one carries an evaluation.
pub fn summarize(batch: &[Exchange], excerpt_chars: usize) -> String {
    let mut parts: Vec<String> = batch
        .iter()
        .map(|e| excerpt(&e.text, excerpt_chars).into_owned())
        .collect();

    let correctness: Vec<f64> = batch
        .iter()
        .filter_map(|e| e.evaluation.as_ref())
        .map(|ev| ev.score_or_neutral(Dimension::Correctness))
        .collect();
    if !correctness.is_empty() {
        let mean = correctness.iter().sum::<f64>() / correctness.len() as f64;
        parts.push(format!("[Score: {mean:.1}/5]"));
    }

    parts.join(SEPARATOR)
}

fn avg_score(batch: &[Exchange]) -> f64 {
    let means: Vec<f64> = batch
        .iter()
        .filter_map(|e| e.evaluation.as_ref())
        .map(|ev| ev.mean_or_neutral())
        .collect();
    if means.is_empty() {
        0.0
    } else {
        means.iter().sum::<f64>() / means.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iv_domain::interview::Evaluation;

    #[test]
    fn plain_fold_joins_texts_in_order() {
        let batch = [
            Exchange::interviewer("Tell me about two sum."),
            Exchange::candidate("I'd use a hash map."),
        ];
        let s = fold(&batch, 0, vec![], 150);
        assert_eq!(s.summary, "Tell me about two sum. | I'd use a hash map.");
        assert_eq!(s.avg_score, 0.0);
        assert_eq!(s.question_index, 0);
    }

    #[test]
    fn long_texts_are_excerpted() {
        let long = "z".repeat(400);
        let batch = [Exchange::candidate(long.clone()), Exchange::interviewer("ok")];
        let s = summarize(&batch, 150);
        let first = s.split(SEPARATOR).next().unwrap();
        assert_eq!(first.chars().count(), 153);
        assert!(first.ends_with("..."));
    }

    #[test]
    fn score_annotation_uses_correctness_only() {
        let batch = [
            Exchange::interviewer("Question"),
            Exchange::candidate("Answer").with_evaluation(Evaluation::scored(4, 1, 1, 1)),
        ];
        let s = fold(&batch, 2, vec!["...heap...".into()], 150);
        assert_eq!(s.summary, "Question | Answer | [Score: 4.0/5]");
        assert!((s.avg_score - 1.75).abs() < 1e-9);
        assert_eq!(s.key_points, vec!["...heap...".to_string()]);
    }

    #[test]
    fn missing_correctness_annotates_neutral() {
        let ev = Evaluation {
            correctness: None,
            communication: Some(5),
            approach: Some(5),
            edge_cases: Some(5),
            notes: None,
        };
        let batch = [Exchange::candidate("a").with_evaluation(ev), Exchange::candidate("b")];
        let s = fold(&batch, 0, vec![], 150);
        assert!(s.summary.ends_with("[Score: 3.0/5]"));
        assert!((s.avg_score - 4.5).abs() < 1e-9);
    }
}

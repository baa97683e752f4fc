//! Digest rendering.
//!
//! Sections appear in a fixed order and each is dropped entirely when its
//! source is empty:
//!
//! ```text
//! === Previous Discussion Summary ===
//! Q1: ...
//!
//! === Key Technical Points Mentioned ===
//! ...a, ...b
//!
//! === Candidate Performance So Far ===
//! Correctness: 4.0/5, Communication: 3.5/5, Approach: 4.0/5
//!
//! === Recent Conversation ===
//! Interviewer: ...
//! Candidate: ...
//! ```
//!
//! The performance line reports correctness, communication and approach.
//! Edge-case scores are tracked but not rendered.

use crate::context::SessionContext;

const SUMMARY_HEADER: &str = "=== Previous Discussion Summary ===";
const KEY_POINTS_HEADER: &str = "=== Key Technical Points Mentioned ===";
const PERFORMANCE_HEADER: &str = "=== Candidate Performance So Far ===";
const RECENT_HEADER: &str = "=== Recent Conversation ===";

pub fn render_digest(ctx: &SessionContext) -> String {
    let limits = ctx.limits();
    let mut sections: Vec<String> = Vec::with_capacity(4);

    let summaries = ctx.summaries_ring();
    if !summaries.is_empty() {
        let mut block = vec![SUMMARY_HEADER.to_owned()];
        block.extend(
            summaries
                .latest(limits.digest_summaries)
                .map(|s| format!("Q{}: {}", u64::from(s.question_index) + 1, s.summary)),
        );
        sections.push(block.join("\n"));
    }

    let key_points = ctx.key_points_ring();
    if !key_points.is_empty() {
        let joined = key_points
            .latest(limits.digest_key_points)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        sections.push(format!("{KEY_POINTS_HEADER}\n{joined}"));
    }

    if let Some(means) = ctx.score_means() {
        sections.push(format!(
            "{PERFORMANCE_HEADER}\nCorrectness: {:.1}/5, Communication: {:.1}/5, Approach: {:.1}/5",
            means.correctness, means.communication, means.approach
        ));
    }

    let mut recent = ctx.recent().peekable();
    if recent.peek().is_some() {
        let mut block = vec![RECENT_HEADER.to_owned()];
        block.extend(recent.map(|e| format!("{}: {}", e.speaker.label(), e.text)));
        sections.push(block.join("\n"));
    }

    sections.join("\n\n")
}

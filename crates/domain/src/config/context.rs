use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session context caps
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Capacities and excerpt sizes for per-session conversation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Live exchange window. Overflow folds the oldest two into a summary.
    #[serde(default = "d_6")]
    pub max_recent_exchanges: usize,
    #[serde(default = "d_10")]
    pub max_summaries: usize,
    #[serde(default = "d_20")]
    pub max_key_points: usize,
    /// Characters kept from each exchange when it is folded into a summary.
    #[serde(default = "d_150")]
    pub summary_excerpt_chars: usize,
    /// Summaries surfaced in the rendered digest.
    #[serde(default = "d_3")]
    pub digest_summaries: usize,
    /// Key points surfaced in the rendered digest.
    #[serde(default = "d_5")]
    pub digest_key_points: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_recent_exchanges: 6,
            max_summaries: 10,
            max_key_points: 20,
            summary_excerpt_chars: 150,
            digest_summaries: 3,
            digest_key_points: 5,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_6() -> usize {
    6
}
fn d_10() -> usize {
    10
}
fn d_20() -> usize {
    20
}
fn d_150() -> usize {
    150
}
fn d_3() -> usize {
    3
}
fn d_5() -> usize {
    5
}

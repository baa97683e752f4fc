use iv_domain::interview::{Dimension, Evaluation};
use serde::Serialize;

/// Running per-dimension totals over every evaluation a session has seen.
///
/// Absent sub-scores count as the neutral mid-point, so an evaluation that
/// skipped `edgeCases` pulls that mean toward 3 rather than toward 0.
#[derive(Debug, Clone, Default)]
pub struct RunningScores {
    totals: [f64; 4],
    count: usize,
}

/// Snapshot of the running means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreMeans {
    pub correctness: f64,
    pub communication: f64,
    pub approach: f64,
    pub edge_cases: f64,
}

impl RunningScores {
    pub fn record(&mut self, evaluation: &Evaluation) {
        for (slot, dim) in self.totals.iter_mut().zip(Dimension::ALL) {
            *slot += evaluation.score_or_neutral(dim);
        }
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// `None` until the first evaluation is recorded.
    pub fn means(&self) -> Option<ScoreMeans> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(ScoreMeans {
            correctness: self.totals[0] / n,
            communication: self.totals[1] / n,
            approach: self.totals[2] / n,
            edge_cases: self.totals[3] / n,
        })
    }
}

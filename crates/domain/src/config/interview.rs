use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Generation parameters per interview operation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterviewConfig {
    #[serde(default = "d_eval_temp")]
    pub evaluation_temperature: f32,
    #[serde(default = "d_report_temp")]
    pub report_temperature: f32,
    #[serde(default = "d_question_temp")]
    pub question_temperature: f32,
    #[serde(default = "d_1024")]
    pub max_output_tokens: u32,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            evaluation_temperature: d_eval_temp(),
            report_temperature: d_report_temp(),
            question_temperature: d_question_temp(),
            max_output_tokens: 1024,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_eval_temp() -> f32 {
    0.7
}
fn d_report_temp() -> f32 {
    0.5
}
fn d_question_temp() -> f32 {
    0.8
}
fn d_1024() -> u32 {
    1024
}

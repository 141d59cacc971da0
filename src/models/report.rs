// src/models/report.rs

use std::collections::BTreeMap;

use serde::Serialize;

use super::record::ScoredRecord;

/// Per-question tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionPerformance {
    pub correct: u64,
    pub total: u64,
    /// `100 * correct / total`.
    pub percentage: f64,
}

/// Summary of one grading run.
/// Keys are ordered so the same batch always serializes identically.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateReport {
    pub question_performance: BTreeMap<String, QuestionPerformance>,
    /// Fraction of a student's records graded correct, in `[0, 1]`.
    pub average_scores: BTreeMap<String, f64>,
}

/// Body returned by the upload endpoint.
/// `results` is only present when the caller asked for per-record details.
#[derive(Debug, Serialize)]
pub struct GradingResponse {
    #[serde(flatten)]
    pub report: AggregateReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ScoredRecord>>,
}

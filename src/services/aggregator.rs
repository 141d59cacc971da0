// src/services/aggregator.rs

use std::collections::BTreeMap;

use crate::models::{
    record::ScoredRecord,
    report::{AggregateReport, QuestionPerformance},
};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    correct: u64,
    total: u64,
}

impl Tally {
    fn add(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// `total` is at least 1 for every tally that exists.
    fn ratio(&self) -> f64 {
        self.correct as f64 / self.total as f64
    }
}

/// Folds scored records into per-question and per-student summaries.
///
/// A plain count per key, so the input order never changes the result and an
/// empty batch yields an empty report.
pub fn aggregate(scored: &[ScoredRecord]) -> AggregateReport {
    let mut by_question: BTreeMap<&str, Tally> = BTreeMap::new();
    let mut by_student: BTreeMap<&str, Tally> = BTreeMap::new();

    for s in scored {
        by_question
            .entry(s.record.question_id.as_str())
            .or_default()
            .add(s.correct);
        by_student
            .entry(s.record.student_name.as_str())
            .or_default()
            .add(s.correct);
    }

    let question_performance = by_question
        .into_iter()
        .map(|(question, tally)| {
            (
                question.to_string(),
                QuestionPerformance {
                    correct: tally.correct,
                    total: tally.total,
                    percentage: tally.ratio() * 100.0,
                },
            )
        })
        .collect();

    let average_scores = by_student
        .into_iter()
        .map(|(student, tally)| (student.to_string(), tally.ratio()))
        .collect();

    AggregateReport {
        question_performance,
        average_scores,
    }
}

// src/services/scorer.rs

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::{
    config::{GRADING_ERROR_FEEDBACK, GradingStrategy},
    models::{
        criteria::{CriteriaStore, GradingCriteria},
        record::{ResponseRecord, ScoredRecord},
    },
    services::completion::{CompletionClient, extract_verdict, grading_prompt},
};

/// Attaches a verdict to response records.
#[async_trait]
pub trait Scorer: Send + Sync {
    fn strategy(&self) -> GradingStrategy;

    /// Scores one record. Never fails; a scorer that cannot reach a verdict
    /// returns a degraded record instead.
    async fn score(&self, record: &ResponseRecord, criteria: &GradingCriteria) -> ScoredRecord;

    /// Scores a whole batch, returning results in input order.
    ///
    /// Every record is scored concurrently and the call returns only once all
    /// of them have resolved.
    async fn score_batch(
        &self,
        records: &[ResponseRecord],
        criteria: &CriteriaStore,
    ) -> Vec<ScoredRecord> {
        join_all(
            records
                .iter()
                .map(|record| self.score(record, criteria.lookup(&record.question_id))),
        )
        .await
    }
}

/// Case-insensitive keyword / ideal-answer substring matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalScorer;

impl LocalScorer {
    /// True iff any keyword, or the ideal answer, occurs in the answer
    /// once both sides are lowercased.
    pub fn evaluate(answer: &str, criteria: &GradingCriteria) -> bool {
        let answer = answer.to_lowercase();

        let keyword_hit = criteria
            .keywords
            .iter()
            .any(|keyword| answer.contains(&keyword.to_lowercase()));

        keyword_hit
            || criteria
                .ideal_answer
                .as_deref()
                .is_some_and(|ideal| answer.contains(&ideal.to_lowercase()))
    }

    fn scored(record: &ResponseRecord, criteria: &GradingCriteria) -> ScoredRecord {
        let correct = Self::evaluate(&record.answer_text, criteria);
        ScoredRecord::new(record.clone(), correct, None)
    }
}

#[async_trait]
impl Scorer for LocalScorer {
    fn strategy(&self) -> GradingStrategy {
        GradingStrategy::Local
    }

    async fn score(&self, record: &ResponseRecord, criteria: &GradingCriteria) -> ScoredRecord {
        Self::scored(record, criteria)
    }

    async fn score_batch(
        &self,
        records: &[ResponseRecord],
        criteria: &CriteriaStore,
    ) -> Vec<ScoredRecord> {
        records
            .iter()
            .map(|record| Self::scored(record, criteria.lookup(&record.question_id)))
            .collect()
    }
}

/// Asks an external completion service for each verdict.
///
/// Criteria are not consulted; the model sees only the question and answer.
#[derive(Clone)]
pub struct DelegatedScorer {
    client: Arc<dyn CompletionClient>,
}

impl DelegatedScorer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Scorer for DelegatedScorer {
    fn strategy(&self) -> GradingStrategy {
        GradingStrategy::Delegated
    }

    async fn score(&self, record: &ResponseRecord, _criteria: &GradingCriteria) -> ScoredRecord {
        let prompt = grading_prompt(&record.question_id, &record.answer_text);

        let verdict = match self.client.complete(&prompt).await {
            Ok(content) => extract_verdict(&content),
            Err(e) => Err(e),
        };

        match verdict {
            Ok(verdict) => ScoredRecord::new(record.clone(), verdict.correct, Some(verdict.feedback)),
            Err(e) => {
                tracing::warn!(
                    student = %record.student_name,
                    question = %record.question_id,
                    "Grading degraded: {}",
                    e
                );
                ScoredRecord::new(record.clone(), false, Some(GRADING_ERROR_FEEDBACK.to_string()))
            }
        }
    }
}

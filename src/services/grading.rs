// src/services/grading.rs

use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::GradingError,
    models::{criteria::CriteriaStore, record::ScoredRecord, report::AggregateReport},
    services::{
        aggregator::aggregate,
        parser::{FileFormat, parse_records},
        scorer::Scorer,
    },
};

/// Everything one grading run produces.
#[derive(Debug)]
pub struct GradingOutcome {
    pub report: AggregateReport,
    /// Scored records in file order.
    pub scored: Vec<ScoredRecord>,
}

/// Runs the whole pipeline for one uploaded file:
/// parse, look up criteria, score, aggregate.
///
/// File-level problems abort before any scoring happens.
pub async fn grade_upload(
    bytes: &[u8],
    filename: &str,
    criteria: &CriteriaStore,
    scorer: &dyn Scorer,
) -> Result<GradingOutcome, GradingError> {
    let span = tracing::info_span!(
        "grading_batch",
        batch_id = %Uuid::new_v4(),
        file = %filename,
        strategy = %scorer.strategy()
    );

    async move {
        let format = FileFormat::from_filename(filename)?;
        let records = parse_records(bytes, format)?;
        tracing::info!("Parsed {} responses", records.len());

        let scored = scorer.score_batch(&records, criteria).await;
        let report = aggregate(&scored);

        let correct = scored.iter().filter(|s| s.correct).count();
        tracing::info!(
            "Graded {} responses ({} correct) across {} questions",
            scored.len(),
            correct,
            report.question_performance.len()
        );

        Ok::<_, GradingError>(GradingOutcome { report, scored })
    }
    .instrument(span)
    .await
}

// src/models/record.rs

use serde::Serialize;

/// One student's answer to one question, as read from a single input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseRecord {
    pub student_name: String,

    /// Value of the `question` column. Used both as the criteria key
    /// and as the question text sent to the completion service.
    #[serde(rename = "question")]
    pub question_id: String,

    #[serde(rename = "student_answer")]
    pub answer_text: String,
}

impl ResponseRecord {
    pub fn new(
        student_name: impl Into<String>,
        question_id: impl Into<String>,
        answer_text: impl Into<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            question_id: question_id.into(),
            answer_text: answer_text.into(),
        }
    }
}

/// A response record with its verdict attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: ResponseRecord,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl ScoredRecord {
    pub fn new(record: ResponseRecord, correct: bool, feedback: Option<String>) -> Self {
        Self {
            record,
            correct,
            feedback,
        }
    }
}

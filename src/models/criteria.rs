// src/models/criteria.rs

use std::{collections::BTreeMap, fs};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ConfigError;

/// How answers to one question are judged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct GradingCriteria {
    /// An answer containing any of these (case-insensitively) is correct.
    #[serde(default)]
    #[validate(custom(function = validate_keywords))]
    pub keywords: Vec<String>,

    /// An answer containing this text (case-insensitively) is correct.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "ideal_answer must not be empty"))]
    pub ideal_answer: Option<String>,
}

impl GradingCriteria {
    pub fn new<I, S>(keywords: I, ideal_answer: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            ideal_answer: ideal_answer.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.ideal_answer.is_none()
    }
}

/// An empty keyword or ideal answer would be a substring of every answer.
fn validate_keywords(keywords: &[String]) -> Result<(), validator::ValidationError> {
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(validator::ValidationError::new("keyword_cannot_be_empty"));
    }
    Ok(())
}

static NO_CRITERIA: GradingCriteria = GradingCriteria {
    keywords: Vec::new(),
    ideal_answer: None,
};

/// Read-only table of criteria keyed by question id.
/// Built once at startup and shared through the application state.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct CriteriaStore {
    entries: BTreeMap<String, GradingCriteria>,
}

impl CriteriaStore {
    pub fn new(entries: BTreeMap<String, GradingCriteria>) -> Self {
        Self { entries }
    }

    /// The criteria this deployment ships with.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            "Q1".to_string(),
            GradingCriteria::new(
                ["capital", "france", "paris"],
                Some("The capital of France is Paris."),
            ),
        );
        entries.insert(
            "Q2".to_string(),
            GradingCriteria::new(
                ["largest", "whale", "earth", "mammal"],
                Some("The largest mammal on earth is the blue whale."),
            ),
        );
        Self { entries }
    }

    /// Parses `{question_id: {"keywords": [...], "ideal_answer": "..."}}`
    /// and validates every entry.
    pub fn from_json_str(source: &str, raw: &str) -> Result<Self, ConfigError> {
        let entries: BTreeMap<String, GradingCriteria> =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(source.to_string(), e))?;

        for (question_id, criteria) in &entries {
            if let Err(validation_errors) = criteria.validate() {
                return Err(ConfigError::Invalid(format!(
                    "criteria for '{}': {}",
                    question_id, validation_errors
                )));
            }
        }

        Ok(Self { entries })
    }

    pub fn from_json_file(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_string(), e))?;
        Self::from_json_str(path, &raw)
    }

    /// Unknown questions get empty criteria, which never match.
    pub fn lookup(&self, question_id: &str) -> &GradingCriteria {
        self.entries.get(question_id).unwrap_or(&NO_CRITERIA)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

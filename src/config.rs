// src/config.rs

use std::{env, fmt, str::FromStr};

use dotenvy::dotenv;

/// Columns every uploaded file must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 3] = ["student_name", "question", "student_answer"];

/// Feedback attached to a record whose delegated grading failed.
pub const GRADING_ERROR_FEEDBACK: &str = "Error in grading";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Which scorer the deployment grades with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingStrategy {
    /// Keyword / ideal-answer substring matching.
    Local,
    /// Verdicts from an external chat-completion service.
    Delegated,
}

impl FromStr for GradingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(GradingStrategy::Local),
            "delegated" => Ok(GradingStrategy::Delegated),
            other => Err(format!("unknown grading strategy '{}'", other)),
        }
    }
}

impl fmt::Display for GradingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradingStrategy::Local => write!(f, "local"),
            GradingStrategy::Delegated => write!(f, "delegated"),
        }
    }
}

/// Settings for the external completion service.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 150,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub bind_addr: String,
    pub static_dir: String,
    pub strategy: GradingStrategy,
    pub criteria_file: Option<String>,
    pub completion: CompletionConfig,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rust_log: "info".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            static_dir: "static".to_string(),
            strategy: GradingStrategy::Local,
            criteria_file: None,
            completion: CompletionConfig::default(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Config::default();

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| defaults.rust_log.clone());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| defaults.bind_addr.clone());

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| defaults.static_dir.clone());

        let strategy = env::var("GRADING_STRATEGY")
            .map(|s| {
                s.parse::<GradingStrategy>()
                    .expect("GRADING_STRATEGY must be 'local' or 'delegated'")
            })
            .unwrap_or(defaults.strategy);

        let criteria_file = env::var("CRITERIA_FILE").ok().filter(|s| !s.is_empty());

        let completion = CompletionConfig {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| defaults.completion.base_url.clone()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| defaults.completion.model.clone()),
            temperature: parse_var("OPENAI_TEMPERATURE", defaults.completion.temperature),
            max_tokens: parse_var("OPENAI_MAX_TOKENS", defaults.completion.max_tokens),
            timeout_secs: parse_var("OPENAI_TIMEOUT_SECS", defaults.completion.timeout_secs),
        };

        let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES", defaults.max_upload_bytes);

        Self {
            rust_log,
            bind_addr,
            static_dir,
            strategy,
            criteria_file,
            completion,
            max_upload_bytes,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{} has an invalid value: '{}'", key, raw)),
        Err(_) => default,
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidConfig { field: String, message: String },

    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error("Failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Transcript not found: {0}")]
    TranscriptNotFound(String),
}

pub type Result<T> = std::result::Result<T, InsightError>;

//! Tunable constants for the analyzers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InsightError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Conversational speaking rate used by the duration estimate.
    pub words_per_minute: f64,
    /// Floor applied to the estimate for non-empty text.
    pub min_duration_minutes: u32,
    /// Duration reported on the empty-text path.
    pub empty_duration_minutes: u32,
    /// Scores strictly above this classify as positive.
    pub positive_threshold: f64,
    /// Scores strictly below this classify as negative.
    pub negative_threshold: f64,
    /// Score used when no sentiment-bearing word matched.
    pub neutral_score: f64,
    /// Inserted between transcripts in combined analysis.
    pub transcript_separator: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 150.0,
            min_duration_minutes: 1,
            empty_duration_minutes: 0,
            positive_threshold: 0.6,
            negative_threshold: 0.4,
            neutral_score: 0.5,
            transcript_separator: "\n".to_string(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: AnalyzerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.words_per_minute.is_finite() && self.words_per_minute > 0.0) {
            return Err(invalid("words_per_minute", "must be a positive number"));
        }
        for (field, value) in [
            ("positive_threshold", self.positive_threshold),
            ("negative_threshold", self.negative_threshold),
            ("neutral_score", self.neutral_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must lie in [0, 1]"));
            }
        }
        if self.negative_threshold > self.positive_threshold {
            return Err(invalid(
                "negative_threshold",
                "must not exceed positive_threshold",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> InsightError {
    InsightError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}

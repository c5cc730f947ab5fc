//! Rule-based sales insight extraction for call transcripts.
//!
//! [`analyze`] turns one transcript into a [`SalesInsight`]; [`analyze_many`]
//! treats a list of transcripts as one combined document. Both are pure
//! functions of the input text and a [`Lexicon`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub mod config;
pub mod error;
pub mod lexicon;
pub mod source;

pub use config::AnalyzerConfig;
pub use error::{InsightError, Result};
pub use lexicon::{
    substring_match, whole_word_count, whole_word_match, whole_word_pattern, Lexicon,
    LexiconTables, DEFAULT_LEXICON,
};
pub use source::{FsTranscriptSource, TranscriptSource};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptInput {
    pub id: String,
    #[serde(default, alias = "transcript")]
    pub text: Option<String>,
}

impl TranscriptInput {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Classify a score, leaving a neutral band between the two thresholds.
    pub fn classify(score: f64, config: &AnalyzerConfig) -> Self {
        if score > config.positive_threshold {
            Sentiment::Positive
        } else if score < config.negative_threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesInsight {
    pub transcript_id: String,
    pub sentiment: Sentiment,
    pub sentiment_score: f64,
    pub topics: BTreeSet<String>,
    pub objections: BTreeSet<String>,
    /// Estimated from word count, not measured from timestamps.
    pub duration_minutes: u32,
    pub next_steps: Vec<String>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Lower-case copy of `text`. Spacing and punctuation are preserved since
/// the matchers depend on them.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Analyzers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentOutput {
    pub positive_hits: usize,
    pub negative_hits: usize,
    pub score: f64,
    pub sentiment: Sentiment,
}

pub fn score_sentiment(
    text: &str,
    lexicon: &Lexicon,
    config: &AnalyzerConfig,
) -> SentimentOutput {
    let positive_hits = lexicon.positive_hits(text);
    let negative_hits = lexicon.negative_hits(text);
    let total = positive_hits + negative_hits;

    let score = if total == 0 {
        config.neutral_score
    } else {
        positive_hits as f64 / total as f64
    };

    SentimentOutput {
        positive_hits,
        negative_hits,
        score,
        sentiment: Sentiment::classify(score, config),
    }
}

pub fn extract_topics(text: &str, lexicon: &Lexicon) -> BTreeSet<String> {
    lexicon
        .topics()
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| substring_match(text, t)))
        .map(|(topic, _)| topic.clone())
        .collect()
}

pub fn detect_objections(text: &str, lexicon: &Lexicon) -> BTreeSet<String> {
    lexicon
        .objections()
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|p| substring_match(text, p)))
        .map(|(label, _)| label.clone())
        .collect()
}

/// Speaking-time estimate at `words_per_minute`, floored at
/// `min_duration_minutes`.
pub fn estimate_duration(text: &str, config: &AnalyzerConfig) -> u32 {
    let minutes = (word_count(text) as f64 / config.words_per_minute).round() as u32;
    minutes.max(config.min_duration_minutes)
}

/// Sentences containing a next-step trigger, in order of appearance.
/// Repeats are kept.
pub fn extract_next_steps(text: &str, lexicon: &Lexicon) -> Vec<String> {
    let triggers = lexicon.next_step_triggers();
    text.split(&['.', '!', '?'][..])
        .filter(|sentence| triggers.iter().any(|t| substring_match(sentence, t)))
        .map(|sentence| {
            let step = capitalize_first(sentence.trim());
            trace!(step = %step, "next step");
            step
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Runs every analyzer over a transcript against a borrowed lexicon.
#[derive(Debug, Clone)]
pub struct InsightEngine<'l> {
    lexicon: &'l Lexicon,
    config: AnalyzerConfig,
}

impl Default for InsightEngine<'static> {
    fn default() -> Self {
        Self {
            lexicon: &DEFAULT_LEXICON,
            config: AnalyzerConfig::default(),
        }
    }
}

impl<'l> InsightEngine<'l> {
    /// Fails if `config` does not pass [`AnalyzerConfig::validate`].
    pub fn new(lexicon: &'l Lexicon, config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { lexicon, config })
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.lexicon
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Insight reported for empty or missing text.
    pub fn empty_insight(&self, transcript_id: &str) -> SalesInsight {
        SalesInsight {
            transcript_id: transcript_id.to_string(),
            sentiment: Sentiment::classify(self.config.neutral_score, &self.config),
            sentiment_score: self.config.neutral_score,
            topics: BTreeSet::new(),
            objections: BTreeSet::new(),
            duration_minutes: self.config.empty_duration_minutes,
            next_steps: Vec::new(),
        }
    }

    pub fn analyze(&self, transcript_id: &str, text: &str) -> SalesInsight {
        if text.is_empty() {
            debug!(transcript_id, "empty transcript, using default insight");
            return self.empty_insight(transcript_id);
        }

        let normalized = normalize(text);
        let sentiment = score_sentiment(&normalized, self.lexicon, &self.config);
        let topics = extract_topics(&normalized, self.lexicon);
        let objections = detect_objections(&normalized, self.lexicon);
        let duration_minutes = estimate_duration(&normalized, &self.config);
        let next_steps = extract_next_steps(&normalized, self.lexicon);

        debug!(
            transcript_id,
            lexicon = self.lexicon.version(),
            positive = sentiment.positive_hits,
            negative = sentiment.negative_hits,
            score = sentiment.score,
            topics = topics.len(),
            objections = objections.len(),
            duration_minutes,
            next_steps = next_steps.len(),
            "transcript analyzed"
        );

        SalesInsight {
            transcript_id: transcript_id.to_string(),
            sentiment: sentiment.sentiment,
            sentiment_score: sentiment.score,
            topics,
            objections,
            duration_minutes,
            next_steps,
        }
    }

    pub fn analyze_input(&self, input: &TranscriptInput) -> SalesInsight {
        self.analyze(&input.id, input.text())
    }

    /// One insight over all transcripts joined in the given order.
    pub fn analyze_many(&self, transcripts: &[TranscriptInput]) -> SalesInsight {
        let id = combination_id(transcripts);
        let combined = transcripts
            .iter()
            .map(TranscriptInput::text)
            .collect::<Vec<_>>()
            .join(&self.config.transcript_separator);
        debug!(
            transcript_id = %id,
            sources = transcripts.len(),
            "combined analysis"
        );
        self.analyze(&id, &combined)
    }

    /// One insight per transcript, in input order.
    pub fn analyze_batch(&self, transcripts: &[TranscriptInput]) -> Vec<SalesInsight> {
        transcripts.iter().map(|t| self.analyze_input(t)).collect()
    }
}

/// Key for a combined analysis: source ids sorted and joined with `_`.
pub fn combination_id(transcripts: &[TranscriptInput]) -> String {
    let mut ids: Vec<&str> = transcripts.iter().map(|t| t.id.as_str()).collect();
    ids.sort_unstable();
    ids.join("_")
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze(transcript_id: &str, text: &str) -> SalesInsight {
    InsightEngine::default().analyze(transcript_id, text)
}

pub fn analyze_many(transcripts: &[TranscriptInput]) -> SalesInsight {
    InsightEngine::default().analyze_many(transcripts)
}

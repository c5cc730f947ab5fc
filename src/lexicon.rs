//! Word and pattern tables shared by every analyzer.
//!
//! Two matching strategies are used on purpose and kept apart:
//! sentiment words count only as whole words ([`whole_word_count`]),
//! while topic, objection and next-step triggers fire on plain
//! containment ([`substring_match`]).

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{InsightError, Result};

// ---------------------------------------------------------------------------
// Matching primitives
// ---------------------------------------------------------------------------

/// Compile `word` into a pattern bounded by `\b` on both sides.
///
/// The word must start and end with a word character; anything else could
/// never satisfy the boundary and is rejected.
pub fn whole_word_pattern(word: &str) -> Result<Regex> {
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    let bounded = word.chars().next().is_some_and(is_word_char)
        && word.chars().last().is_some_and(is_word_char);
    if !bounded {
        return Err(InsightError::InvalidLexicon(format!(
            "'{word}' cannot match as a whole word"
        )));
    }
    Ok(Regex::new(&format!(r"\b{}\b", regex::escape(word)))?)
}

/// Number of non-overlapping whole-word occurrences of `pattern` in `text`.
pub fn whole_word_count(text: &str, pattern: &Regex) -> usize {
    pattern.find_iter(text).count()
}

/// Convenience form of [`whole_word_count`] for a single ad-hoc word.
pub fn whole_word_match(text: &str, word: &str) -> Result<usize> {
    let pattern = whole_word_pattern(word)?;
    Ok(whole_word_count(text, &pattern))
}

pub fn substring_match(text: &str, pattern: &str) -> bool {
    text.contains(pattern)
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Raw, serializable lexicon tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconTables {
    pub version: String,
    #[serde(default)]
    pub positive_words: Vec<String>,
    #[serde(default)]
    pub negative_words: Vec<String>,
    /// Canonical topic tag -> trigger substrings.
    #[serde(default)]
    pub topics: BTreeMap<String, Vec<String>>,
    /// Canonical objection label -> trigger substrings.
    #[serde(default)]
    pub objections: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub next_step_triggers: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn group(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(key, triggers)| (key.to_string(), owned(triggers)))
        .collect()
}

impl LexiconTables {
    pub fn builtin() -> Self {
        Self {
            version: "2024.1".to_string(),
            positive_words: owned(&[
                "great",
                "excellent",
                "good",
                "amazing",
                "wonderful",
                "interested",
                "perfect",
                "love",
                "best",
                "helpful",
                "yes",
                "definitely",
                "absolutely",
                "awesome",
            ]),
            negative_words: owned(&[
                "bad",
                "poor",
                "terrible",
                "awful",
                "expensive",
                "difficult",
                "complicated",
                "no",
                "not",
                "don't",
                "cant",
                "wont",
                "problem",
            ]),
            topics: group(&[
                (
                    "pricing",
                    &[
                        "pricing",
                        "price",
                        "cost",
                        "budget",
                        "expensive",
                        "affordable",
                        "cheap",
                    ],
                ),
                (
                    "features",
                    &["features", "feature", "functionality", "capabilities", "capability"],
                ),
                (
                    "integration",
                    &["integration", "integrate", "connection", "api", "webhook", "sync"],
                ),
                ("support", &["support", "help", "assistance", "documentation"]),
                (
                    "security",
                    &["security", "secure", "privacy", "data protection"],
                ),
                (
                    "implementation",
                    &["implementation", "implement", "setup", "installation"],
                ),
                ("performance", &["performance", "speed", "fast", "slow", "reliable"]),
                ("training", &["training", "learn", "tutorial", "onboarding"]),
            ]),
            objections: group(&[
                (
                    "Too expensive",
                    &["expensive", "costly", "price too high", "cost too much"],
                ),
                (
                    "Need more time",
                    &["need time", "think about it", "not ready", "too soon", "need to think"],
                ),
                (
                    "Missing features",
                    &["missing", "lacks", "doesn't have", "need feature"],
                ),
                (
                    "Complex setup",
                    &["complicated", "complex", "difficult to set up", "hard to use"],
                ),
                (
                    "Already have solution",
                    &["already using", "current solution", "existing tool", "already have"],
                ),
                ("Not sure", &["not sure", "unsure"]),
                ("Competitor mentioned", &["competitor"]),
            ]),
            next_step_triggers: owned(&[
                "follow up",
                "next step",
                "action item",
                "will send",
                "schedule",
                "meeting",
                "demo",
                "call",
                "send",
                "review",
                "discuss",
                "meet",
            ]),
        }
    }
}

// ---------------------------------------------------------------------------
// Compiled lexicon
// ---------------------------------------------------------------------------

/// Immutable lexicon with whole-word patterns compiled up front.
///
/// Every entry is lower-cased on construction so it lines up with
/// normalized transcript text. Labels (topic tags, objection names) keep
/// their original spelling since they are emitted verbatim.
#[derive(Debug, Clone)]
pub struct Lexicon {
    tables: LexiconTables,
    positive: Vec<Regex>,
    negative: Vec<Regex>,
}

pub static DEFAULT_LEXICON: Lazy<Lexicon> =
    Lazy::new(|| Lexicon::new(LexiconTables::builtin()).expect("built-in lexicon is valid"));

impl Lexicon {
    pub fn new(mut tables: LexiconTables) -> Result<Self> {
        validate(&tables)?;
        lowercase_all(&mut tables.positive_words);
        lowercase_all(&mut tables.negative_words);
        lowercase_all(&mut tables.next_step_triggers);
        for triggers in tables.topics.values_mut().chain(tables.objections.values_mut()) {
            lowercase_all(triggers);
        }

        let positive = compile_words(&tables.positive_words)?;
        let negative = compile_words(&tables.negative_words)?;
        Ok(Self {
            tables,
            positive,
            negative,
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let tables: LexiconTables = toml::from_str(s)?;
        Self::new(tables)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    pub fn version(&self) -> &str {
        &self.tables.version
    }

    pub fn tables(&self) -> &LexiconTables {
        &self.tables
    }

    pub fn positive_hits(&self, text: &str) -> usize {
        self.positive.iter().map(|p| whole_word_count(text, p)).sum()
    }

    pub fn negative_hits(&self, text: &str) -> usize {
        self.negative.iter().map(|p| whole_word_count(text, p)).sum()
    }

    pub fn topics(&self) -> &BTreeMap<String, Vec<String>> {
        &self.tables.topics
    }

    pub fn objections(&self) -> &BTreeMap<String, Vec<String>> {
        &self.tables.objections
    }

    pub fn next_step_triggers(&self) -> &[String] {
        &self.tables.next_step_triggers
    }
}

fn lowercase_all(words: &mut [String]) {
    for w in words.iter_mut() {
        *w = w.to_lowercase();
    }
}

fn compile_words(words: &[String]) -> Result<Vec<Regex>> {
    words.iter().map(|w| whole_word_pattern(w)).collect()
}

fn validate(tables: &LexiconTables) -> Result<()> {
    if tables.version.trim().is_empty() {
        return Err(InsightError::InvalidLexicon(
            "version must not be empty".to_string(),
        ));
    }
    let word_lists = [
        ("positive_words", &tables.positive_words),
        ("negative_words", &tables.negative_words),
        ("next_step_triggers", &tables.next_step_triggers),
    ];
    for (name, list) in word_lists {
        if list.iter().any(|w| w.trim().is_empty()) {
            return Err(InsightError::InvalidLexicon(format!(
                "{name} contains an empty entry"
            )));
        }
    }
    for (kind, map) in [("topic", &tables.topics), ("objection", &tables.objections)] {
        for (label, triggers) in map {
            if label.trim().is_empty() {
                return Err(InsightError::InvalidLexicon(format!(
                    "{kind} with an empty label"
                )));
            }
            if triggers.is_empty() {
                return Err(InsightError::InvalidLexicon(format!(
                    "{kind} '{label}' has no triggers"
                )));
            }
            if triggers.iter().any(|t| t.trim().is_empty()) {
                return Err(InsightError::InvalidLexicon(format!(
                    "{kind} '{label}' has an empty trigger"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_word_ignores_embedded_words() {
        assert_eq!(whole_word_match("i cannot say", "can").unwrap(), 0);
        assert_eq!(whole_word_match("we can, we can!", "can").unwrap(), 2);
        assert_eq!(whole_word_match("nothing notable", "not").unwrap(), 0);
        assert_eq!(whole_word_match("i don't know", "don't").unwrap(), 1);
    }

    #[test]
    fn whole_word_rejects_unbounded_entries() {
        assert!(matches!(
            whole_word_match("a +1 here", "+1"),
            Err(InsightError::InvalidLexicon(_))
        ));
        assert!(whole_word_pattern("wow!").is_err());
        assert!(whole_word_pattern("").is_err());

        let mut tables = LexiconTables::builtin();
        tables.positive_words.push("+1".to_string());
        assert!(matches!(
            Lexicon::new(tables),
            Err(InsightError::InvalidLexicon(_))
        ));
    }

    #[test]
    fn substring_matches_inside_words() {
        assert!(!substring_match("the pricing page", "price"));
        assert!(substring_match("recall the details", "call"));
        assert!(substring_match("strong data protection rules", "data protection"));
    }

    #[test]
    fn builtin_lexicon_compiles() {
        let lexicon = &*DEFAULT_LEXICON;
        assert_eq!(lexicon.version(), "2024.1");
        assert_eq!(lexicon.topics().len(), 8);
        assert!(lexicon.objections().contains_key("Too expensive"));
        assert_eq!(lexicon.positive_hits("great, just great"), 2);
        assert_eq!(lexicon.negative_hits("no, not now"), 2);
    }

    #[test]
    fn entries_are_lowercased() {
        let mut tables = LexiconTables::builtin();
        tables.positive_words = vec!["Stellar".to_string()];
        tables
            .topics
            .insert("Hiring".to_string(), vec!["Recruit".to_string()]);
        let lexicon = Lexicon::new(tables).unwrap();
        assert_eq!(lexicon.positive_hits("stellar work"), 1);
        assert_eq!(lexicon.topics()["Hiring"], vec!["recruit".to_string()]);
    }

    #[test]
    fn rejects_topic_without_triggers() {
        let mut tables = LexiconTables::builtin();
        tables.topics.insert("empty".to_string(), vec![]);
        let err = Lexicon::new(tables).unwrap_err();
        assert!(matches!(err, InsightError::InvalidLexicon(_)));
    }

    #[test]
    fn rejects_blank_version() {
        let mut tables = LexiconTables::builtin();
        tables.version = "  ".to_string();
        assert!(Lexicon::new(tables).is_err());
    }

    #[test]
    fn parses_toml_tables() {
        let raw = r#"
version = "test-1"
positive_words = ["yay"]
negative_words = ["boo"]
next_step_triggers = ["ping"]

[topics]
weather = ["rain", "sun"]

[objections]
"Bad timing" = ["not now"]
"#;
        let lexicon = Lexicon::from_toml_str(raw).unwrap();
        assert_eq!(lexicon.version(), "test-1");
        assert_eq!(lexicon.positive_hits("yay yay"), 2);
        assert_eq!(lexicon.objections()["Bad timing"], vec!["not now".to_string()]);
        assert_eq!(lexicon.next_step_triggers(), ["ping".to_string()]);
    }
}

//! Mood classification for journal entries.
//!
//! Classification runs in two stages: a crisis-phrase scan over the
//! lower-cased text, then a polarity score mapped onto a label. The scan
//! always runs first and short-circuits scoring.

pub mod suggestions;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use suggestions::suggestion_for;

/// Phrases indicating self-harm, hopelessness or worthlessness.
pub const CRISIS_PHRASES: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "want to die",
    "better off dead",
    "no reason to live",
    "give up",
    "can't take it anymore",
    "hopeless",
    "worthless",
    "burden",
    "everyone would be better off",
    "no point",
];

/// Polarity above this is Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Polarity below this is Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodLabel {
    Crisis,
    Positive,
    Negative,
    Neutral,
}

impl MoodLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Crisis => "Crisis",
            MoodLabel::Positive => "Positive",
            MoodLabel::Negative => "Negative",
            MoodLabel::Neutral => "Neutral",
        }
    }

    /// Maps an informal tag supplied by the client. Unknown tags yield `None`
    /// and are stored as given.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "happy" | "smile" => Some(MoodLabel::Positive),
            "sad" | "angry" => Some(MoodLabel::Negative),
            "neutral" => Some(MoodLabel::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Crisis" => Ok(MoodLabel::Crisis),
            "Positive" => Ok(MoodLabel::Positive),
            "Negative" => Ok(MoodLabel::Negative),
            "Neutral" => Ok(MoodLabel::Neutral),
            _ => Err(()),
        }
    }
}

/// A lexical sentiment scorer producing polarity in `[-1, 1]`.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// VADER compound score.
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderScorer;

impl PolarityScorer for VaderScorer {
    fn polarity(&self, text: &str) -> f64 {
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0)
    }
}

pub struct MoodClassifier {
    scorer: Box<dyn PolarityScorer>,
}

impl Default for MoodClassifier {
    fn default() -> Self {
        Self::new(Box::new(VaderScorer))
    }
}

impl MoodClassifier {
    pub fn new(scorer: Box<dyn PolarityScorer>) -> Self {
        Self { scorer }
    }

    pub fn classify(&self, text: &str) -> MoodLabel {
        if contains_crisis_phrase(text) {
            tracing::info!("Crisis phrase detected in journal entry");
            return MoodLabel::Crisis;
        }
        label_for_polarity(self.scorer.polarity(text))
    }
}

pub fn contains_crisis_phrase(text: &str) -> bool {
    let lowered = text.to_lowercase().replace('\u{2019}', "'");
    CRISIS_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

pub fn label_for_polarity(polarity: f64) -> MoodLabel {
    if polarity > POSITIVE_THRESHOLD {
        MoodLabel::Positive
    } else if polarity < NEGATIVE_THRESHOLD {
        MoodLabel::Negative
    } else {
        MoodLabel::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl PolarityScorer for Fixed {
        fn polarity(&self, _text: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_crisis_beats_positive_polarity() {
        let classifier = MoodClassifier::new(Box::new(Fixed(0.9)));
        assert_eq!(
            classifier.classify("Such a lovely day but I feel HOPELESS"),
            MoodLabel::Crisis
        );
    }

    #[test]
    fn test_every_phrase_detected_in_any_case() {
        let classifier = MoodClassifier::new(Box::new(Fixed(1.0)));
        for phrase in CRISIS_PHRASES {
            let text = format!("today {} honestly", phrase.to_uppercase());
            assert_eq!(classifier.classify(&text), MoodLabel::Crisis, "{phrase}");
        }
    }

    #[test]
    fn test_curly_apostrophe_folded() {
        assert!(contains_crisis_phrase("I can\u{2019}t take it anymore"));
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(label_for_polarity(0.06), MoodLabel::Positive);
        assert_eq!(label_for_polarity(0.05), MoodLabel::Neutral);
        assert_eq!(label_for_polarity(0.0), MoodLabel::Neutral);
        assert_eq!(label_for_polarity(-0.05), MoodLabel::Neutral);
        assert_eq!(label_for_polarity(-0.06), MoodLabel::Negative);
    }

    #[test]
    fn test_vader_examples() {
        let classifier = MoodClassifier::default();
        assert_eq!(
            classifier.classify("Had a wonderful day at the park!"),
            MoodLabel::Positive
        );
        assert_eq!(
            classifier.classify("This was a terrible, awful day."),
            MoodLabel::Negative
        );
        assert_eq!(
            classifier.classify("I feel hopeless and want to give up"),
            MoodLabel::Crisis
        );
    }

    #[test]
    fn test_vader_polarity_in_range() {
        let scorer = VaderScorer;
        for text in ["great great great!!!", "horrible", "the table", "ok"] {
            let p = scorer.polarity(text);
            assert!((-1.0..=1.0).contains(&p), "{text}: {p}");
        }
    }

    #[test]
    fn test_tag_mapping() {
        assert_eq!(MoodLabel::from_tag("happy"), Some(MoodLabel::Positive));
        assert_eq!(MoodLabel::from_tag(" Smile "), Some(MoodLabel::Positive));
        assert_eq!(MoodLabel::from_tag("sad"), Some(MoodLabel::Negative));
        assert_eq!(MoodLabel::from_tag("ANGRY"), Some(MoodLabel::Negative));
        assert_eq!(MoodLabel::from_tag("neutral"), Some(MoodLabel::Neutral));
        assert_eq!(MoodLabel::from_tag("sleepy"), None);
    }

    #[test]
    fn test_label_roundtrips_through_str() {
        for label in [
            MoodLabel::Crisis,
            MoodLabel::Positive,
            MoodLabel::Negative,
            MoodLabel::Neutral,
        ] {
            assert_eq!(label.as_str().parse::<MoodLabel>(), Ok(label));
        }
    }
}

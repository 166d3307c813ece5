//! Lexicon-based polarity scoring
//!
//! Rule-based valence scoring in the style of VADER: each known word carries a
//! valence in roughly [-4, 4], adjusted for boosters, negation, capitalization
//! and contrastive "but", then the sum is normalized into [-1, 1].

use super::SentimentScorer;
use anyhow::Result;
use std::collections::HashMap;

/// Normalization constant approximating the maximum expected sum
const NORMALIZATION_ALPHA: f64 = 15.0;

const BOOSTER_INCREMENT: f64 = 0.293;
const CAPS_INCREMENT: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_INCREMENT: f64 = 0.292;

const BUILTIN_LEXICON: &[(&str, f64)] = &[
    // negative
    ("abuse", -3.2),
    ("abused", -3.2),
    ("afraid", -2.2),
    ("angry", -2.3),
    ("attack", -2.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("betrayed", -2.8),
    ("blame", -1.4),
    ("crime", -2.5),
    ("cruel", -2.8),
    ("damage", -2.2),
    ("dangerous", -2.1),
    ("dead", -3.3),
    ("death", -2.9),
    ("depressed", -2.3),
    ("destroy", -2.5),
    ("disaster", -3.1),
    ("disgusting", -2.4),
    ("failure", -2.3),
    ("fear", -2.2),
    ("fraud", -2.8),
    ("furious", -2.7),
    ("harass", -2.5),
    ("harassment", -2.5),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("illegal", -2.6),
    ("kill", -3.7),
    ("killed", -3.5),
    ("late", -0.7),
    ("lawsuit", -1.3),
    ("lie", -1.6),
    ("miserable", -2.2),
    ("murder", -3.7),
    ("pain", -2.3),
    ("problem", -1.7),
    ("punish", -2.4),
    ("sad", -2.1),
    ("scandal", -1.9),
    ("sick", -2.3),
    ("steal", -2.2),
    ("stolen", -2.2),
    ("suffer", -2.5),
    ("terrible", -2.1),
    ("threat", -2.4),
    ("threaten", -2.5),
    ("ugly", -2.3),
    ("violence", -3.1),
    ("violent", -3.1),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
    // positive
    ("amazing", 2.8),
    ("appreciate", 1.7),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("brilliant", 2.8),
    ("calm", 1.3),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("fine", 0.8),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("kind", 2.4),
    ("like", 1.5),
    ("love", 3.2),
    ("lovely", 2.8),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("pleased", 1.9),
    ("safe", 1.9),
    ("success", 2.7),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("welcome", 2.0),
    ("wonderful", 2.7),
];

const BOOSTERS: &[&str] = &[
    "absolutely",
    "completely",
    "deeply",
    "extremely",
    "incredibly",
    "really",
    "so",
    "totally",
    "utterly",
    "very",
];

const NEGATIONS: &[&str] = &[
    "aint", "aren't", "can't", "cannot", "couldn't", "didn't", "doesn't", "don't", "hardly",
    "isn't", "never", "no", "nor", "not", "nothing", "wasn't", "weren't", "without", "won't",
    "wouldn't",
];

/// Word valences plus the modifier word lists
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Built-in English lexicon
    pub fn builtin() -> Self {
        Self {
            valences: BUILTIN_LEXICON
                .iter()
                .map(|(word, valence)| (word.to_string(), *valence))
                .collect(),
        }
    }

    /// Add or override word valences
    pub fn extend(mut self, entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        for (word, valence) in entries {
            self.valences.insert(word.to_lowercase(), valence);
        }
        self
    }

    /// Valence of a single lowercase word
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    /// Adjusted valence for every sentiment-bearing token of `text`
    ///
    /// Tokens without a lexicon entry are skipped.
    pub fn token_valences(&self, text: &str) -> Vec<f64> {
        let tokens = tokenize(text);
        let shouting_everywhere = tokens
            .iter()
            .filter(|t| t.chars().any(char::is_alphabetic))
            .all(|t| is_all_caps(t));

        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let but_index = lowered.iter().position(|t| t == "but");

        let mut valences = Vec::new();
        for (i, word) in lowered.iter().enumerate() {
            let Some(mut valence) = self.valence(word) else {
                continue;
            };

            if !shouting_everywhere && is_all_caps(&tokens[i]) {
                valence += CAPS_INCREMENT * valence.signum();
            }

            if i > 0 && BOOSTERS.contains(&lowered[i - 1].as_str()) {
                valence += BOOSTER_INCREMENT * valence.signum();
            }

            let window = i.saturating_sub(3)..i;
            if lowered[window].iter().any(|w| NEGATIONS.contains(&w.as_str())) {
                valence *= NEGATION_SCALAR;
            }

            if let Some(but) = but_index {
                if i < but {
                    valence *= 0.5;
                } else if i > but {
                    valence *= 1.5;
                }
            }

            valences.push(valence);
        }

        valences
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Split text into word tokens, trimming surrounding punctuation
pub(crate) fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().filter(|c| c.is_alphabetic()).count() > 1
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

/// Normalize a raw valence sum into [-1, 1]
pub fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Lexicon-based polarity scorer
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer {
    lexicon: Lexicon,
}

impl LexiconScorer {
    /// Create a scorer with the built-in lexicon
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with a custom lexicon
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Compound polarity of `text`
    pub fn compound(&self, text: &str) -> f64 {
        let mut sum: f64 = self.lexicon.token_valences(text).iter().sum();

        if sum != 0.0 {
            let exclamations = text.chars().filter(|c| *c == '!').count().min(4) as f64;
            sum += exclamations * EXCLAMATION_INCREMENT * sum.signum();
        }

        normalize(sum)
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<f64> {
        Ok(self.compound(text))
    }

    fn name(&self) -> &'static str {
        "lexicon_scorer"
    }
}

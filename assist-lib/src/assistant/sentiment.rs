use serde::{Serialize, Deserialize};

pub const VERY_POSITIVE: f64 = 0.75;
pub const POSITIVE: f64 = 0.25;
pub const NEGATIVE: f64 = -0.25;
pub const VERY_NEGATIVE: f64 = -0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emotion {
    #[serde(rename = "Very Positive")]
    VeryPositive,
    #[serde(rename = "Positive")]
    Positive,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Very Negative")]
    VeryNegative,
    #[serde(rename = "Not Analyzed")]
    NotAnalyzed,
}

impl Emotion {
    /// buckets a polarity into one of the five bands
    ///
    /// ```text
    /// [0.75, inf)     Very Positive
    /// [0.25, 0.75)    Positive
    /// (-0.25, 0.25)   Neutral
    /// [-0.75, -0.25]  Negative
    /// (-inf, -0.75)   Very Negative
    /// ```
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity >= VERY_POSITIVE {
            Emotion::VeryPositive
        } else if polarity >= POSITIVE {
            Emotion::Positive
        } else if polarity > NEGATIVE {
            Emotion::Neutral
        } else if polarity >= VERY_NEGATIVE {
            Emotion::Negative
        } else {
            Emotion::VeryNegative
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Emotion::Negative | Emotion::VeryNegative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::VeryPositive => "Very Positive",
            Emotion::Positive => "Positive",
            Emotion::Neutral => "Neutral",
            Emotion::Negative => "Negative",
            Emotion::VeryNegative => "Very Negative",
            Emotion::NotAnalyzed => "Not Analyzed",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    /// -1.0 to 1.0
    pub polarity: f64,
    /// 0.0 to 1.0
    pub subjectivity: f64,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Sentiment {
            polarity: 0.0,
            subjectivity: 0.0,
        }
    }

    pub fn emotion(&self) -> Emotion {
        Emotion::from_polarity(self.polarity)
    }
}

pub trait SentimentAnalyzer: Send + Sync {
    fn sentiment(&self, text: &str) -> Sentiment;
}

/// (word, polarity, subjectivity)
const LEXICON: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("brilliant", 0.9, 1.0),
    ("excellent", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("fine", 0.4, 0.5),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("helpful", 0.5, 0.5),
    ("like", 0.2, 0.3),
    ("love", 0.5, 0.6),
    ("lovely", 0.5, 0.75),
    ("nice", 0.6, 1.0),
    ("perfect", 1.0, 1.0),
    ("pleased", 0.5, 1.0),
    ("thanks", 0.2, 0.2),
    ("wonderful", 1.0, 1.0),
    ("angry", -0.5, 1.0),
    ("annoying", -0.8, 0.9),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("boring", -1.0, 1.0),
    ("broken", -0.4, 0.4),
    ("disappointed", -0.75, 0.75),
    ("disgusting", -1.0, 1.0),
    ("frustrated", -0.7, 0.7),
    ("hate", -0.8, 0.9),
    ("horrible", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("stupid", -0.8, 1.0),
    ("terrible", -1.0, 1.0),
    ("ugly", -0.7, 1.0),
    ("upset", -0.6, 0.8),
    ("useless", -0.5, 0.2),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("so", 1.2),
    ("quite", 1.1),
    ("slightly", 0.5),
    ("somewhat", 0.7),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "nothing", "neither", "nor"];

/// scales the polarity of a negated word
const NEGATION_FACTOR: f64 = -0.5;

fn lookup(word: &str) -> Option<(f64, f64)> {
    LEXICON.iter()
        .find(|(w, _, _)| *w == word)
        .map(|(_, p, s)| (*p, *s))
}

fn intensity(word: &str) -> Option<f64> {
    INTENSIFIERS.iter()
        .find(|(w, _)| *w == word)
        .map(|(_, v)| *v)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

/// averages the scores of known words. a preceding intensifier scales the
/// next word and a negation flips it until the end of the clause
#[derive(Debug, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        LexiconSentiment
    }
}

impl SentimentAnalyzer for LexiconSentiment {
    fn sentiment(&self, text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();

        for clause in lowered.split(|ch: char| matches!(ch, '.' | ',' | ';' | '!' | '?' | ':')) {
            let mut negate = false;
            let mut scale = 1.0;

            for word in clause.split(|ch: char| !(ch.is_alphanumeric() || ch == '\'')) {
                if word.is_empty() {
                    continue;
                }

                if is_negation(word) {
                    negate = true;
                    continue;
                }

                if let Some(v) = intensity(word) {
                    scale *= v;
                    continue;
                }

                if let Some((polarity, subjectivity)) = lookup(word) {
                    let mut value = (polarity * scale).clamp(-1.0, 1.0);

                    if negate {
                        value *= NEGATION_FACTOR;
                        negate = false;
                    }

                    polarities.push(value);
                    subjectivities.push((subjectivity * scale).clamp(0.0, 1.0));
                }

                scale = 1.0;
            }
        }

        if polarities.is_empty() {
            return Sentiment::neutral();
        }

        let count = polarities.len() as f64;

        Sentiment {
            polarity: (polarities.iter().sum::<f64>() / count).clamp(-1.0, 1.0),
            subjectivity: (subjectivities.iter().sum::<f64>() / count).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bucket_examples() {
        assert_eq!(Emotion::from_polarity(0.8), Emotion::VeryPositive);
        assert_eq!(Emotion::from_polarity(0.1), Emotion::Neutral);
        assert_eq!(Emotion::from_polarity(-0.9), Emotion::VeryNegative);
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(Emotion::from_polarity(0.75), Emotion::VeryPositive);
        assert_eq!(Emotion::from_polarity(0.25), Emotion::Positive);
        assert_eq!(Emotion::from_polarity(0.0), Emotion::Neutral);
        assert_eq!(Emotion::from_polarity(-0.25), Emotion::Negative);
        assert_eq!(Emotion::from_polarity(-0.75), Emotion::Negative);
        assert_eq!(Emotion::from_polarity(-0.7501), Emotion::VeryNegative);
        assert_eq!(Emotion::from_polarity(1.0), Emotion::VeryPositive);
        assert_eq!(Emotion::from_polarity(-1.0), Emotion::VeryNegative);
    }

    #[test]
    fn emotion_serializes_display_names() {
        let json = serde_json::to_string(&Emotion::VeryNegative).unwrap();

        assert_eq!(json, "\"Very Negative\"");
        assert_eq!(Emotion::NotAnalyzed.to_string(), "Not Analyzed");
    }

    #[test]
    fn lexicon_scores() {
        let analyzer = LexiconSentiment::new();

        assert_eq!(analyzer.sentiment("This is terrible").emotion(), Emotion::VeryNegative);
        assert_eq!(analyzer.sentiment("the weather report").emotion(), Emotion::Neutral);
        assert_eq!(analyzer.sentiment("").polarity, 0.0);
    }

    #[test]
    fn intensifier_and_negation() {
        let analyzer = LexiconSentiment::new();

        let plain = analyzer.sentiment("good");
        let very = analyzer.sentiment("very good");
        let negated = analyzer.sentiment("not good");

        assert!(very.polarity > plain.polarity);
        assert_eq!(very.emotion(), Emotion::VeryPositive);
        assert!(negated.polarity < 0.0);
        assert_eq!(negated.emotion(), Emotion::Negative);
    }

    #[test]
    fn negation_stops_at_clause_end() {
        let analyzer = LexiconSentiment::new();
        let result = analyzer.sentiment("it isn't broken. great work");

        // "isn't broken" flips to a small positive, "great" stays positive
        assert!(result.polarity > 0.25);
    }
}

use regex::Regex;
use serde::Serialize;

use super::route::Sarcasm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Url,
    Email,
    Date,
    Money,
    Percent,
    Cardinal,
    Org,
    Person,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Noun,
    Propn,
    Pron,
    Verb,
    Aux,
    Adj,
    Adv,
    Adp,
    Det,
    Cconj,
    Num,
    Intj,
    Punct,
}

/// syntactic role of a token relative to the root of its sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dependency {
    Root,
    Nsubj,
    Dobj,
    Pobj,
    Prep,
    Det,
    Amod,
    Advmod,
    Aux,
    Cc,
    Conj,
    Nummod,
    Intj,
    Punct,
    /// attached to the sentence without a more specific role
    Dep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub pos: PartOfSpeech,
    pub dep: Dependency,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub entities: Vec<Entity>,
    pub tokens: Vec<Token>,
    pub sarcasm: Sarcasm,
}

pub trait TextAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Analysis;
}

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each",
    "every", "my", "your", "his", "her", "its", "our", "their",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them",
    "mine", "yours", "ours", "theirs", "myself", "yourself", "who", "what",
    "which", "someone", "something", "anyone", "anything",
];

const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "by", "for", "with", "about", "from", "to", "of", "into",
    "over", "under", "between", "through", "after", "before", "during", "without",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "so", "yet"];

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did",
    "have", "has", "had", "can", "could", "will", "would", "shall", "should",
    "may", "might", "must",
];

const INTERJECTIONS: &[&str] = &["hello", "hi", "hey", "oh", "wow", "please", "thanks", "yes", "no", "ok", "okay"];

const VERBS: &[&str] = &[
    "create", "generate", "make", "need", "want", "help", "find", "get", "give",
    "know", "think", "tell", "ask", "buy", "sell", "invest", "build", "write",
    "say", "see", "go", "use", "work", "like", "love", "hate", "feel", "try",
];

const ORG_SUFFIXES: &[&str] = &["Inc", "Corp", "Ltd", "LLC", "Bank", "Group", "Hospital", "University"];

/// words in the text that suggest the sentiment may be meant the other way
pub const SARCASM_CUES: &[&str] = &["yeah right", "sure", "as if", "totally", "great", "wonderful"];

pub fn detect_sarcasm(text: &str) -> Sarcasm {
    let lowered = text.to_lowercase();

    if SARCASM_CUES.iter().any(|cue| lowered.contains(cue)) {
        Sarcasm::Possible
    } else {
        Sarcasm::None
    }
}

/// regex and word list based analysis. good enough to give the assistant
/// something to log without loading a model
pub struct RuleAnalyzer {
    url_regex: Regex,
    email_regex: Regex,
    date_regex: Regex,
    money_regex: Regex,
    percent_regex: Regex,
    cardinal_regex: Regex,
    proper_regex: Regex,
    token_regex: Regex,
}

impl RuleAnalyzer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(RuleAnalyzer {
            url_regex: Regex::new(r#"https?://[^\s<>")\]]+"#)?,
            email_regex: Regex::new(r"\b[\w.+-]+@[\w-]+(?:\.[\w-]+)+\b")?,
            date_regex: Regex::new(
                r"(?i)\b(?:\d{4}-\d{2}-\d{2}|yesterday|today|tomorrow|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(?:,\s*\d{4})?)\b"
            )?,
            money_regex: Regex::new(
                r"(?i)(?:\$\d[\d,]*(?:\.\d+)?|\b\d[\d,]*(?:\.\d+)?\s*(?:usd|eur|gbp|dollars?|euros?))"
            )?,
            percent_regex: Regex::new(r"\b\d+(?:\.\d+)?\s*(?:%|percent\b)")?,
            cardinal_regex: Regex::new(r"\b\d[\d,]*(?:\.\d+)?\b")?,
            proper_regex: Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b")?,
            token_regex: Regex::new(r"[\w'$%.@-]+|[^\w\s]")?,
        })
    }

    fn entities(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        let mut taken: Vec<(usize, usize)> = Vec::new();

        let mut push = |start: usize, end: usize, label: EntityLabel, entities: &mut Vec<Entity>| {
            if taken.iter().any(|(s, e)| start < *e && *s < end) {
                return;
            }

            taken.push((start, end));
            entities.push(Entity {
                text: text[start..end].trim_end_matches('.').to_owned(),
                label,
            });
        };

        // more specific patterns first so a number inside a url or an amount
        // is not reported again as a cardinal
        let ordered = [
            (&self.url_regex, EntityLabel::Url),
            (&self.email_regex, EntityLabel::Email),
            (&self.money_regex, EntityLabel::Money),
            (&self.percent_regex, EntityLabel::Percent),
            (&self.date_regex, EntityLabel::Date),
            (&self.cardinal_regex, EntityLabel::Cardinal),
        ];

        for (regex, label) in ordered {
            for m in regex.find_iter(text) {
                push(m.start(), m.end(), label, &mut entities);
            }
        }

        for m in self.proper_regex.find_iter(text) {
            if is_sentence_start(text, m.start()) && !m.as_str().contains(' ') {
                continue;
            }

            let last = m.as_str().split_whitespace().last().unwrap_or_default();
            let label = if ORG_SUFFIXES.contains(&last) {
                EntityLabel::Org
            } else {
                EntityLabel::Person
            };

            push(m.start(), m.end(), label, &mut entities);
        }

        entities
    }

    fn tokens(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();

        for m in self.token_regex.find_iter(text) {
            let word = m.as_str().trim_end_matches('.');
            let word = if word.is_empty() { m.as_str() } else { word };

            tokens.push(Token {
                text: word.to_owned(),
                pos: tag(word, is_sentence_start(text, m.start())),
                dep: Dependency::Dep,
            });

            if word.len() < m.as_str().len() {
                tokens.push(Token {
                    text: String::from("."),
                    pos: PartOfSpeech::Punct,
                    dep: Dependency::Dep,
                });
            }
        }

        for sentence in tokens.split_mut(|token| is_sentence_end(&token.text)) {
            label_dependencies(sentence);
        }

        for token in tokens.iter_mut().filter(|token| is_sentence_end(&token.text)) {
            token.dep = Dependency::Punct;
        }

        tokens
    }
}

impl TextAnalyzer for RuleAnalyzer {
    fn analyze(&self, text: &str) -> Analysis {
        Analysis {
            entities: self.entities(text),
            tokens: self.tokens(text),
            sarcasm: detect_sarcasm(text),
        }
    }
}

fn is_sentence_start(text: &str, index: usize) -> bool {
    let before = text[..index].trim_end();

    before.is_empty() || before.ends_with(['.', '!', '?'])
}

fn is_sentence_end(text: &str) -> bool {
    matches!(text, "." | "!" | "?")
}

fn is_nominal(pos: PartOfSpeech) -> bool {
    matches!(pos, PartOfSpeech::Noun | PartOfSpeech::Propn | PartOfSpeech::Pron)
}

/// head word of the sentence: the first main verb, else the first
/// auxiliary, else the first nominal
fn find_root(sentence: &[Token]) -> Option<usize> {
    let first = |wanted: fn(PartOfSpeech) -> bool| sentence.iter().position(|token| wanted(token.pos));

    first(|pos| pos == PartOfSpeech::Verb)
        .or_else(|| first(|pos| pos == PartOfSpeech::Aux))
        .or_else(|| first(is_nominal))
}

/// flat labeling around the root. nominals before it are subjects, after
/// it objects, and after a preposition objects of that preposition
fn label_dependencies(sentence: &mut [Token]) {
    let root = find_root(sentence);
    let mut after_prep = false;
    let mut after_cc = false;

    for (index, token) in sentence.iter_mut().enumerate() {
        let dep = if Some(index) == root {
            Dependency::Root
        } else {
            match token.pos {
                PartOfSpeech::Punct => Dependency::Punct,
                PartOfSpeech::Det => Dependency::Det,
                PartOfSpeech::Adp => Dependency::Prep,
                PartOfSpeech::Aux => Dependency::Aux,
                PartOfSpeech::Cconj => Dependency::Cc,
                PartOfSpeech::Intj => Dependency::Intj,
                PartOfSpeech::Num => Dependency::Nummod,
                PartOfSpeech::Adj => Dependency::Amod,
                PartOfSpeech::Adv => Dependency::Advmod,
                PartOfSpeech::Verb => if after_cc {
                    Dependency::Conj
                } else {
                    Dependency::Dep
                },
                PartOfSpeech::Noun | PartOfSpeech::Propn | PartOfSpeech::Pron => if after_prep {
                    Dependency::Pobj
                } else if after_cc {
                    Dependency::Conj
                } else if root.map_or(true, |root| index < root) {
                    Dependency::Nsubj
                } else {
                    Dependency::Dobj
                },
            }
        };

        token.dep = dep;

        // determiners and modifiers sit between a preposition or conjunction
        // and the word it attaches to
        match token.pos {
            PartOfSpeech::Adp => after_prep = true,
            PartOfSpeech::Cconj => after_cc = true,
            PartOfSpeech::Det | PartOfSpeech::Adj | PartOfSpeech::Num => {},
            _ => {
                after_prep = false;
                after_cc = false;
            }
        }
    }
}

fn tag(word: &str, sentence_start: bool) -> PartOfSpeech {
    if !word.chars().any(|ch| ch.is_alphanumeric()) {
        return PartOfSpeech::Punct;
    }

    if word.trim_start_matches('$').chars().all(|ch| ch.is_ascii_digit() || ch == ',' || ch == '.' || ch == '%') {
        return PartOfSpeech::Num;
    }

    let lowered = word.to_lowercase();
    let lowered = lowered.as_str();

    if DETERMINERS.contains(&lowered) {
        PartOfSpeech::Det
    } else if PRONOUNS.contains(&lowered) {
        PartOfSpeech::Pron
    } else if ADPOSITIONS.contains(&lowered) {
        PartOfSpeech::Adp
    } else if CONJUNCTIONS.contains(&lowered) {
        PartOfSpeech::Cconj
    } else if AUXILIARIES.contains(&lowered) {
        PartOfSpeech::Aux
    } else if INTERJECTIONS.contains(&lowered) {
        PartOfSpeech::Intj
    } else if VERBS.contains(&lowered) || lowered.ends_with("ing") || lowered.ends_with("ed") {
        PartOfSpeech::Verb
    } else if !sentence_start && word.starts_with(|ch: char| ch.is_uppercase()) {
        PartOfSpeech::Propn
    } else if lowered.ends_with("ly") {
        PartOfSpeech::Adv
    } else if ["ful", "ous", "ive", "able", "ible", "al", "ic", "less"].iter().any(|s| lowered.ends_with(s)) {
        PartOfSpeech::Adj
    } else {
        PartOfSpeech::Noun
    }
}

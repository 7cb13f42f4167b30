//! the chat assistant. composes text analysis, sentiment, sense
//! disambiguation and generation behind traits and keeps the per session
//! bookkeeping in a [`Conversation`]. translation, speech and topic lookup are
//! optional remote capabilities attached after construction

use serde::Serialize;

pub mod analysis;
pub mod conversation;
pub mod generate;
pub mod lookup;
pub mod route;
pub mod sense;
pub mod sentiment;
pub mod service;
pub mod speech;
pub mod translate;

pub use analysis::{Analysis, TextAnalyzer, RuleAnalyzer};
pub use conversation::{Conversation, HistoryEntry, Mood};
pub use generate::{TextGenerator, GenerateError, HttpGenerator, LocalGenerator};
pub use route::{Route, Industry, Sarcasm};
pub use lookup::{InformationSource, WikipediaSummary};
pub use sense::{SenseDisambiguator, LeskDisambiguator, WordSense};
pub use sentiment::{Emotion, Sentiment, SentimentAnalyzer, LexiconSentiment};
pub use service::ServiceError;
pub use speech::{SpeechSynthesizer, HttpSpeech};
pub use translate::{Translator, HttpTranslator};

pub const FALLBACK_RESPONSE: &str = "I'm processing your query to find the best possible solution.";

pub const SELF_TALK: [&str; 5] = [
    "Stay calm.",
    "Let's think this through.",
    "Maintain composure.",
    "Focus on the positive.",
    "Take a deep breath.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Emotion,
    Logic,
}

impl Mode {
    /// "emotion" selects sentiment analysis, anything else is logic
    pub fn from_name(name: &str) -> Self {
        if name == "emotion" {
            Mode::Emotion
        } else {
            Mode::Logic
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Logic
    }
}

/// spoken form of a sentiment result
#[derive(Debug, Clone)]
pub struct Verbalized {
    pub text: String,
    pub audio: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub response: String,
    pub emotion: Emotion,
    pub history: Vec<HistoryEntry>,
}

pub struct Assistant {
    analyzer: Box<dyn TextAnalyzer>,
    sentiment: Box<dyn SentimentAnalyzer>,
    senses: Box<dyn SenseDisambiguator>,
    generator: Box<dyn TextGenerator>,
    translator: Option<Box<dyn Translator>>,
    speech: Option<Box<dyn SpeechSynthesizer>>,
    information: Option<Box<dyn InformationSource>>,
}

impl Assistant {
    pub fn new(
        analyzer: Box<dyn TextAnalyzer>,
        sentiment: Box<dyn SentimentAnalyzer>,
        senses: Box<dyn SenseDisambiguator>,
        generator: Box<dyn TextGenerator>,
    ) -> Self {
        Assistant {
            analyzer,
            sentiment,
            senses,
            generator,
            translator: None,
            speech: None,
            information: None,
        }
    }

    /// rule based analysis, lexicon sentiment, lesk senses and the local
    /// generator
    pub fn builtin() -> Result<Self, regex::Error> {
        Ok(Assistant::new(
            Box::new(RuleAnalyzer::new()?),
            Box::new(LexiconSentiment::new()),
            Box::new(LeskDisambiguator::default()),
            Box::new(LocalGenerator::default()),
        ))
    }

    pub fn with_generator(self, generator: Box<dyn TextGenerator>) -> Self {
        Assistant {
            generator,
            ..self
        }
    }

    pub fn with_translator(self, translator: Box<dyn Translator>) -> Self {
        Assistant {
            translator: Some(translator),
            ..self
        }
    }

    pub fn with_speech(self, speech: Box<dyn SpeechSynthesizer>) -> Self {
        Assistant {
            speech: Some(speech),
            ..self
        }
    }

    pub fn with_information(self, information: Box<dyn InformationSource>) -> Self {
        Assistant {
            information: Some(information),
            ..self
        }
    }

    pub fn disambiguate_word(&self, sentence: &str, word: &str) -> WordSense {
        self.senses.disambiguate(sentence, word)
    }

    pub async fn translate(&self, text: &str, target: &str) -> Result<String, ServiceError> {
        let Some(translator) = &self.translator else {
            return Err(ServiceError::Unavailable("translation"));
        };

        translator.translate(text, translate::AUTO, target).await
    }

    /// sentiment of the text read out loud
    pub async fn verbalize_emotion(&self, text: &str) -> Result<Verbalized, ServiceError> {
        let Some(synthesizer) = &self.speech else {
            return Err(ServiceError::Unavailable("speech"));
        };

        let sentence = speech::emotion_sentence(&self.sentiment.sentiment(text));
        let audio = synthesizer.synthesize(&sentence, speech::DEFAULT_LANG).await?;

        Ok(Verbalized {
            text: sentence,
            audio,
        })
    }

    pub async fn get_latest_information(&self, topic: &str) -> Result<String, ServiceError> {
        let Some(information) = &self.information else {
            return Err(ServiceError::Unavailable("information lookup"));
        };

        information.latest(topic).await
    }

    fn detect_emotion(&self, conversation: &mut Conversation, text: &str) -> Emotion {
        let sentiment = self.sentiment.sentiment(text);
        let emotion = sentiment.emotion();

        tracing::debug!(
            polarity = sentiment.polarity,
            subjectivity = sentiment.subjectivity,
            "sentiment"
        );

        conversation.mood = Mood {
            emotion,
            intensity: sentiment.polarity,
        };

        if emotion.is_negative() {
            for phrase in SELF_TALK {
                tracing::info!("{phrase}");
            }

            conversation.mood = Mood::default();
        }

        emotion
    }

    pub async fn handle_message(
        &self,
        conversation: &mut Conversation,
        text: &str,
        consent: bool,
        mode: Mode,
    ) -> Result<Reply, GenerateError> {
        let analysis = self.analyzer.analyze(text);

        tracing::debug!(
            entities = ?analysis.entities,
            tokens = ?analysis.tokens,
            "analysis"
        );

        for token in &analysis.tokens {
            if let WordSense::Resolved(sense) = self.senses.disambiguate(text, &token.text) {
                tracing::debug!(word = %token.text, sense = sense.name, "word sense");
            }
        }

        if analysis.sarcasm == Sarcasm::Possible {
            tracing::debug!("possible sarcasm detected");
        }

        let emotion = match mode {
            Mode::Emotion => self.detect_emotion(conversation, text),
            Mode::Logic => Emotion::NotAnalyzed,
        };

        let mut response = match Route::classify(text) {
            Route::Generate => self.generator.generate(text).await?,
            Route::Industry(industry) => format!(
                "As an AI specializing in {industry}, I suggest the following solution..."
            ),
            Route::Fallback => FALLBACK_RESPONSE.to_owned(),
        };

        if mode == Mode::Emotion {
            response.push_str(&format!(" Detected emotion: {emotion}."));
        }

        if consent {
            conversation.push(HistoryEntry {
                user_input: text.to_owned(),
                response: response.clone(),
                emotion,
            });
        }

        Ok(Reply {
            response,
            emotion,
            history: conversation.history().iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct FixedGenerator;

    #[async_trait::async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            Ok(String::from("generated text"))
        }
    }

    struct FailingGenerator;

    #[async_trait::async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            Err(GenerateError::Empty)
        }
    }

    struct EchoTranslator;

    #[async_trait::async_trait]
    impl Translator for EchoTranslator {
        async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ServiceError> {
            Ok(format!("{source}>{target}: {text}"))
        }
    }

    struct TextAsAudio;

    #[async_trait::async_trait]
    impl SpeechSynthesizer for TextAsAudio {
        async fn synthesize(&self, text: &str, _lang: &str) -> Result<Vec<u8>, ServiceError> {
            Ok(text.as_bytes().to_vec())
        }
    }

    struct NamedTopic;

    #[async_trait::async_trait]
    impl InformationSource for NamedTopic {
        async fn latest(&self, topic: &str) -> Result<String, ServiceError> {
            Ok(format!("summary of {topic}"))
        }
    }

    fn assistant() -> Assistant {
        Assistant::builtin()
            .unwrap()
            .with_generator(Box::new(FixedGenerator))
    }

    #[test]
    fn mode_names() {
        assert_eq!(Mode::from_name("emotion"), Mode::Emotion);
        assert_eq!(Mode::from_name("logic"), Mode::Logic);
        assert_eq!(Mode::from_name("anything"), Mode::Logic);
        assert_eq!(Mode::from_name("Emotion"), Mode::Logic);
    }

    #[tokio::test]
    async fn no_consent_no_history() {
        let assistant = assistant();
        let mut conversation = Conversation::default();

        let reply = assistant.handle_message(&mut conversation, "my bank account", false, Mode::Logic)
            .await
            .unwrap();

        assert!(reply.history.is_empty());
        assert!(conversation.is_empty());
    }

    #[tokio::test]
    async fn consent_appends_history() {
        let assistant = assistant();
        let mut conversation = Conversation::default();

        assistant.handle_message(&mut conversation, "hello", true, Mode::Logic).await.unwrap();
        let reply = assistant.handle_message(&mut conversation, "see a doctor", true, Mode::Logic)
            .await
            .unwrap();

        assert_eq!(reply.history.len(), 2);
        assert_eq!(reply.history[0].response, FALLBACK_RESPONSE);
        assert_eq!(reply.history[1].user_input, "see a doctor");
        assert_eq!(reply.history[1].emotion, Emotion::NotAnalyzed);
    }

    #[tokio::test]
    async fn generate_wins_over_industry() {
        let assistant = assistant();
        let mut conversation = Conversation::default();

        let reply = assistant.handle_message(&mut conversation, "generate a stock summary", false, Mode::Logic)
            .await
            .unwrap();

        assert_eq!(reply.response, "generated text");
        assert_eq!(reply.emotion, Emotion::NotAnalyzed);
    }

    #[tokio::test]
    async fn industry_response() {
        let assistant = assistant();
        let mut conversation = Conversation::default();

        let reply = assistant.handle_message(&mut conversation, "I need new hardware", false, Mode::Logic)
            .await
            .unwrap();

        assert_eq!(
            reply.response,
            "As an AI specializing in technology, I suggest the following solution..."
        );
    }

    #[tokio::test]
    async fn emotion_mode_suffix() {
        let assistant = assistant();
        let mut conversation = Conversation::default();

        let reply = assistant.handle_message(&mut conversation, "this is wonderful", true, Mode::Emotion)
            .await
            .unwrap();

        assert_eq!(reply.emotion, Emotion::VeryPositive);
        assert_eq!(
            reply.response,
            format!("{FALLBACK_RESPONSE} Detected emotion: Very Positive.")
        );
        assert_eq!(conversation.mood.emotion, Emotion::VeryPositive);
    }

    #[tokio::test]
    async fn negative_mood_resets() {
        let assistant = assistant();
        let mut conversation = Conversation::default();

        let reply = assistant.handle_message(&mut conversation, "this is terrible", false, Mode::Emotion)
            .await
            .unwrap();

        assert_eq!(reply.emotion, Emotion::VeryNegative);
        assert!(reply.response.ends_with(" Detected emotion: Very Negative."));
        assert_eq!(conversation.mood, Mood::default());
    }

    #[tokio::test]
    async fn history_is_capped() {
        let assistant = assistant();
        let mut conversation = Conversation::new(2);

        for text in ["one", "two", "three"] {
            assistant.handle_message(&mut conversation, text, true, Mode::Logic).await.unwrap();
        }

        let inputs: Vec<&str> = conversation.history()
            .iter()
            .map(|e| e.user_input.as_str())
            .collect();

        assert_eq!(inputs, vec!["two", "three"]);
    }

    #[test]
    fn disambiguates_words() {
        let assistant = assistant();

        let WordSense::Resolved(found) = assistant.disambiguate_word("I deposited money at the bank", "bank") else {
            panic!("bank should resolve");
        };

        assert_eq!(found.name, "bank.n.01");
        assert_eq!(
            assistant.disambiguate_word("hello there", "hello").definition(),
            sense::NO_DEFINITION
        );
    }

    #[tokio::test]
    async fn remote_capabilities_unavailable() {
        let assistant = assistant();

        assert!(matches!(
            assistant.translate("hello", "es").await,
            Err(ServiceError::Unavailable(_))
        ));
        assert!(matches!(
            assistant.verbalize_emotion("this is wonderful").await,
            Err(ServiceError::Unavailable(_))
        ));
        assert!(matches!(
            assistant.get_latest_information("Rust").await,
            Err(ServiceError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn remote_capabilities_attached() {
        let assistant = assistant()
            .with_translator(Box::new(EchoTranslator))
            .with_speech(Box::new(TextAsAudio))
            .with_information(Box::new(NamedTopic));

        assert_eq!(assistant.translate("hello", "es").await.unwrap(), "auto>es: hello");
        assert_eq!(assistant.get_latest_information("Rust").await.unwrap(), "summary of Rust");

        let spoken = assistant.verbalize_emotion("this is wonderful").await.unwrap();

        assert!(spoken.text.starts_with("The emotion detected is Very Positive with a polarity of "));
        assert_eq!(spoken.audio, spoken.text.as_bytes());
    }

    #[tokio::test]
    async fn generator_failure_leaves_history_untouched() {
        let assistant = Assistant::builtin()
            .unwrap()
            .with_generator(Box::new(FailingGenerator));
        let mut conversation = Conversation::default();

        let result = assistant.handle_message(&mut conversation, "create a poem", true, Mode::Logic).await;

        assert!(result.is_err());
        assert!(conversation.is_empty());
    }
}

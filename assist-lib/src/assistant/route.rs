use serde::Serialize;

/// substrings that send a message to the text generator
pub const GENERATE_TRIGGERS: &[&str] = &["create", "generate"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Finance,
    Healthcare,
    Technology,
}

impl Industry {
    /// checked in this order, the first match wins
    pub const ALL: [Industry; 3] = [
        Industry::Finance,
        Industry::Healthcare,
        Industry::Technology,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Industry::Finance => &["finance", "investment", "bank", "stock"],
            Industry::Healthcare => &["health", "medicine", "doctor", "hospital"],
            Industry::Technology => &["technology", "computer", "software", "hardware"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Finance => "finance",
            Industry::Healthcare => "healthcare",
            Industry::Technology => "technology",
        }
    }

    /// finds the first industry with a keyword contained in the lowercase
    /// text
    pub fn detect(lowered: &str) -> Option<Industry> {
        Self::ALL.into_iter()
            .find(|industry| industry.keywords().iter().any(|k| lowered.contains(k)))
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Generate,
    Industry(Industry),
    Fallback,
}

impl Route {
    /// substring matching on the lowercased text. "generate" and "create"
    /// take precedence over any industry keyword
    pub fn classify(text: &str) -> Route {
        let lowered = text.to_lowercase();

        if GENERATE_TRIGGERS.iter().any(|t| lowered.contains(t)) {
            return Route::Generate;
        }

        match Industry::detect(&lowered) {
            Some(industry) => Route::Industry(industry),
            None => Route::Fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sarcasm {
    Possible,
    None,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generate_wins_over_industry() {
        assert_eq!(Route::classify("Generate a stock report"), Route::Generate);
        assert_eq!(Route::classify("please CREATE a hospital plan"), Route::Generate);
    }

    #[test]
    fn industries_in_order() {
        assert_eq!(Route::classify("my bank account"), Route::Industry(Industry::Finance));
        assert_eq!(Route::classify("see a doctor"), Route::Industry(Industry::Healthcare));
        assert_eq!(Route::classify("new hardware"), Route::Industry(Industry::Technology));
        // finance is checked before technology
        assert_eq!(
            Route::classify("software for stock trading"),
            Route::Industry(Industry::Finance)
        );
    }

    #[test]
    fn substring_matching() {
        // "recreate" contains "create"
        assert_eq!(Route::classify("recreate it"), Route::Generate);
        // "healthy" contains "health"
        assert_eq!(Route::classify("eating healthy"), Route::Industry(Industry::Healthcare));
    }

    #[test]
    fn fallback() {
        assert_eq!(Route::classify("hello there"), Route::Fallback);
        assert_eq!(Route::classify(""), Route::Fallback);
    }
}

//! word sense disambiguation over a small fixed inventory

use std::collections::HashSet;

pub const NO_DEFINITION: &str = "No definition found.";

/// one meaning of a word with the words that usually surround it
#[derive(Debug, PartialEq, Eq)]
pub struct Sense {
    pub word: &'static str,
    /// "word.pos.nn", e.g. "bank.n.01"
    pub name: &'static str,
    pub definition: &'static str,
    pub examples: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSense {
    Resolved(&'static Sense),
    Unknown,
}

impl WordSense {
    pub fn definition(&self) -> &'static str {
        match self {
            WordSense::Resolved(sense) => sense.definition,
            WordSense::Unknown => NO_DEFINITION,
        }
    }
}

pub trait SenseDisambiguator: Send + Sync {
    /// meaning of `word` as it is used in `sentence`
    fn disambiguate(&self, sentence: &str, word: &str) -> WordSense;
}

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "of", "to", "in", "on", "at", "by", "for", "with", "and",
    "or", "is", "are", "was", "be", "it", "its", "that", "this", "as", "from",
    "i", "my", "you", "your", "we", "our", "they", "their", "which", "who",
];

pub const SENSES: &[Sense] = &[
    Sense {
        word: "bank",
        name: "bank.n.01",
        definition: "a financial institution that accepts deposits and channels the money into lending activities",
        examples: &["he cashed a check at the bank", "that bank holds the mortgage on my home", "open an account"],
    },
    Sense {
        word: "bank",
        name: "bank.n.02",
        definition: "sloping land beside a body of water",
        examples: &["they pulled the canoe up on the bank", "he sat on the bank of the river and watched the currents"],
    },
    Sense {
        word: "stock",
        name: "stock.n.01",
        definition: "the capital raised by a corporation through the issue of shares entitling holders to an ownership interest",
        examples: &["he owns a controlling share of the company's stock", "the stock market and its investors"],
    },
    Sense {
        word: "stock",
        name: "stock.n.02",
        definition: "the merchandise that a shop has on hand",
        examples: &["they carried a vast stock of hardware in the store", "the item is out of stock"],
    },
    Sense {
        word: "interest",
        name: "interest.n.01",
        definition: "a fixed charge for borrowing money usually a percentage of the amount borrowed",
        examples: &["how much interest do you pay on your mortgage loan", "the rate the bank charges"],
    },
    Sense {
        word: "interest",
        name: "interest.n.02",
        definition: "a sense of concern with and curiosity about someone or something",
        examples: &["an interest in music", "she lost interest in the hobby"],
    },
    Sense {
        word: "virus",
        name: "virus.n.01",
        definition: "a microscopic infectious agent that replicates inside living cells and causes disease",
        examples: &["the doctor said the flu virus spreads in hospital wards", "a patient with a viral infection"],
    },
    Sense {
        word: "virus",
        name: "virus.n.02",
        definition: "a malicious software program that copies itself into other programs on a computer",
        examples: &["the virus corrupted files on the hard drive", "antivirus software removed it from the computer"],
    },
    Sense {
        word: "mouse",
        name: "mouse.n.01",
        definition: "a small rodent with a pointed snout and a long tail",
        examples: &["the cat chased a mouse through the kitchen"],
    },
    Sense {
        word: "mouse",
        name: "mouse.n.02",
        definition: "a hand operated device that moves a cursor on a computer screen",
        examples: &["click the left mouse button", "plug the wireless mouse into the computer hardware"],
    },
    Sense {
        word: "bug",
        name: "bug.n.01",
        definition: "a fault or defect in a computer program or system",
        examples: &["the software update fixed a bug that crashed the program"],
    },
    Sense {
        word: "bug",
        name: "bug.n.02",
        definition: "a small insect",
        examples: &["a bug crawled across the garden leaf"],
    },
    Sense {
        word: "cell",
        name: "cell.n.01",
        definition: "the basic structural and functional unit of all living organisms",
        examples: &["blood cells carry oxygen through the body", "the doctor examined the tissue cells"],
    },
    Sense {
        word: "cell",
        name: "cell.n.02",
        definition: "a room where a prisoner is kept",
        examples: &["the prisoner was locked in his cell"],
    },
    Sense {
        word: "drive",
        name: "drive.n.01",
        definition: "a device that writes data onto or reads data from a storage medium",
        examples: &["the computer has a solid state drive", "back up files to an external hard drive"],
    },
    Sense {
        word: "drive",
        name: "drive.n.02",
        definition: "a journey in a vehicle such as a car",
        examples: &["we went for a drive in the country", "a long drive on the road"],
    },
];

fn signature_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|ch: char| !ch.is_alphanumeric() && ch != '\'')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
}

/// simplified lesk. the sense whose definition and examples share the most
/// words with the sentence wins, ties going to the earlier sense
pub struct LeskDisambiguator {
    inventory: &'static [Sense],
}

impl LeskDisambiguator {
    pub fn new(inventory: &'static [Sense]) -> Self {
        LeskDisambiguator { inventory }
    }

    pub fn knows(&self, word: &str) -> bool {
        let lowered = word.to_lowercase();

        self.inventory.iter().any(|sense| sense.word == lowered)
    }
}

impl Default for LeskDisambiguator {
    fn default() -> Self {
        LeskDisambiguator::new(SENSES)
    }
}

impl SenseDisambiguator for LeskDisambiguator {
    fn disambiguate(&self, sentence: &str, word: &str) -> WordSense {
        let word = word.to_lowercase();
        let context: HashSet<String> = signature_words(sentence)
            .filter(|found| *found != word)
            .collect();

        let mut best: Option<(&'static Sense, usize)> = None;

        for sense in self.inventory.iter().filter(|sense| sense.word == word) {
            let signature: HashSet<String> = signature_words(sense.definition)
                .chain(sense.examples.iter().flat_map(|example| signature_words(example)))
                .filter(|found| *found != word)
                .collect();

            let overlap = signature.intersection(&context).count();

            if best.map_or(true, |(_, score)| overlap > score) {
                best = Some((sense, overlap));
            }
        }

        match best {
            Some((sense, _)) => WordSense::Resolved(sense),
            None => WordSense::Unknown,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn name_of(sense: WordSense) -> &'static str {
        match sense {
            WordSense::Resolved(sense) => sense.name,
            WordSense::Unknown => "unknown",
        }
    }

    #[test]
    fn context_picks_sense() {
        let lesk = LeskDisambiguator::default();

        assert_eq!(name_of(lesk.disambiguate("I deposited money at the bank", "bank")), "bank.n.01");
        assert_eq!(name_of(lesk.disambiguate("we fished from the river bank", "bank")), "bank.n.02");
        assert_eq!(name_of(lesk.disambiguate("my computer caught a virus", "virus")), "virus.n.02");
        assert_eq!(name_of(lesk.disambiguate("the doctor treated the virus", "Virus")), "virus.n.01");
    }

    #[test]
    fn no_overlap_takes_first_sense() {
        let lesk = LeskDisambiguator::default();

        assert_eq!(name_of(lesk.disambiguate("bank", "bank")), "bank.n.01");
    }

    #[test]
    fn unknown_word() {
        let lesk = LeskDisambiguator::default();
        let sense = lesk.disambiguate("a sentence about nothing", "nothing");

        assert_eq!(sense, WordSense::Unknown);
        assert_eq!(sense.definition(), NO_DEFINITION);
        assert!(!lesk.knows("nothing"));
        assert!(lesk.knows("Stock"));
    }

    #[test]
    fn inventory_names_match_words() {
        for sense in SENSES {
            assert!(sense.name.starts_with(&format!("{}.", sense.word)), "{}", sense.name);
        }
    }
}

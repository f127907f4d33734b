//! English vs Roman-Urdu classification from lexical cues.
//!
//! Colloquial queries in this domain code-switch heavily ("kya price hai for
//! haircut"), so later words are unreliable; the opening word is the signal
//! that matters. Resolution order, each a short-circuit:
//!
//! 1. first word exact match against either language's starter set
//! 2. first word prefix match
//! 3. second word exact/prefix match
//! 4. known bilingual phrase prefix on the whole text
//! 5. majority vote over the first 3 tokens, ties toward English
//! 6. default English
//!
//! All tables are plain data so they can be tested in isolation.

use glambot_core::types::{Language, Message, Role};

/// High-frequency Roman-Urdu starters: question words, pronouns, auxiliaries.
/// Must stay disjoint from `ENGLISH_WORDS`.
const URDU_WORDS: &[&str] = &[
    "kya", "kia", "kon", "kaun", "konsa", "konsi", "konse", "kaunsa", "kaunsi",
    "kaunse", "kab", "kahan", "kaise", "kyun", "kitna", "kitne", "kitni",
    "aap", "apka", "apke", "apki", "apko", "tum", "mera", "meri", "mere",
    "mujhe", "hum", "hamara", "hai", "hain", "ho", "hoon", "batao", "batayein",
    "bata", "salam", "assalam", "aur", "iski", "uska", "yeh", "woh",
];

/// High-frequency English starters. Disjoint from `URDU_WORDS`.
const ENGLISH_WORDS: &[&str] = &[
    "what", "when", "where", "who", "whom", "whose", "why", "how", "which",
    "is", "are", "was", "were", "am", "do", "does", "did", "can", "could",
    "will", "would", "should", "may", "might", "i", "you", "your", "we",
    "the", "a", "an", "please", "hello", "hi", "hey", "tell", "show", "give",
    "thanks", "thank", "any", "about",
];

/// Prefix rules for partial matches ("kitnaa", "kahaan", misspelled starters).
const URDU_PREFIXES: &[&str] = &["kya", "kon", "kaun", "kit", "kah", "kais", "bata", "chah", "apk"];
const ENGLISH_PREFIXES: &[&str] = &["wh", "pleas", "hell", "show", "tell", "whats"];

/// Bilingual phrase openings that disambiguate a mixed first word.
const PHRASE_PREFIXES: &[(&str, Language)] = &[
    ("please show", Language::English),
    ("please tell", Language::English),
    ("do you", Language::English),
    ("can you", Language::English),
    ("apke pass", Language::RomanUrdu),
    ("apke paas", Language::RomanUrdu),
    ("aap ke", Language::RomanUrdu),
    ("kya aap", Language::RomanUrdu),
    ("salon ka", Language::RomanUrdu),
    ("price kya", Language::RomanUrdu),
];

fn exact_lang(word: &str) -> Option<Language> {
    if URDU_WORDS.contains(&word) {
        Some(Language::RomanUrdu)
    } else if ENGLISH_WORDS.contains(&word) {
        Some(Language::English)
    } else {
        None
    }
}

fn prefix_lang(word: &str) -> Option<Language> {
    // Ties between the two rule sets resolve toward English.
    if ENGLISH_PREFIXES.iter().any(|p| word.starts_with(p)) {
        Some(Language::English)
    } else if URDU_PREFIXES.iter().any(|p| word.starts_with(p)) {
        Some(Language::RomanUrdu)
    } else {
        None
    }
}

fn word_lang(word: &str) -> Option<Language> {
    exact_lang(word).or_else(|| prefix_lang(word))
}

/// Classify a text span as English or Roman Urdu. Pure and deterministic.
///
/// Empty input defaults to English.
pub fn detect(text: &str) -> Language {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .take(3)
        .collect();

    let Some(first) = tokens.first() else {
        return Language::English;
    };

    // 1–2. First word, exact then prefix.
    if let Some(lang) = exact_lang(first) {
        return lang;
    }
    if let Some(lang) = prefix_lang(first) {
        return lang;
    }

    // 3. Second word.
    if let Some(second) = tokens.get(1)
        && let Some(lang) = word_lang(second)
    {
        return lang;
    }

    // 4. Bilingual phrase openings.
    for (phrase, lang) in PHRASE_PREFIXES {
        if lowered.starts_with(phrase) {
            return *lang;
        }
    }

    // 5. Majority vote over the first 3 tokens; ties toward English.
    let mut urdu = 0u32;
    let mut english = 0u32;
    for token in &tokens {
        match word_lang(token) {
            Some(Language::RomanUrdu) => urdu += 1,
            Some(Language::English) => english += 1,
            None => {}
        }
    }
    if urdu > english {
        Language::RomanUrdu
    } else {
        Language::English
    }
}

/// Infer language from the last 3 user messages when the current message is
/// ambiguous. A weak majority decides; ties favor Roman Urdu, since an
/// ambiguous follow-up in an Urdu conversation is almost always Urdu.
pub fn from_history(history: &[Message]) -> Language {
    let recent: Vec<&Message> = history
        .iter()
        .filter(|m| m.role == Role::User)
        .rev()
        .take(3)
        .collect();

    if recent.is_empty() {
        return Language::English;
    }

    let urdu = recent
        .iter()
        .filter(|m| detect(&m.content) == Language::RomanUrdu)
        .count();
    if urdu * 2 >= recent.len() {
        Language::RomanUrdu
    } else {
        Language::English
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_sets_disjoint() {
        for w in URDU_WORDS {
            assert!(!ENGLISH_WORDS.contains(w), "{w} appears in both sets");
        }
    }

    #[test]
    fn test_first_word_dominates() {
        // Urdu starter wins regardless of trailing English content.
        assert_eq!(detect("kya price hai for haircut"), Language::RomanUrdu);
        assert_eq!(detect("kitna cost for gold facial please"), Language::RomanUrdu);
        assert_eq!(detect("what is the price of haircut"), Language::English);
    }

    #[test]
    fn test_second_word_fallback() {
        // "salon" signals nothing; "kahan" decides.
        assert_eq!(detect("salon kahan hai"), Language::RomanUrdu);
        assert_eq!(detect("haircut price what is it"), Language::English);
    }

    #[test]
    fn test_phrase_prefix() {
        assert_eq!(detect("salon ka naam?"), Language::RomanUrdu);
    }

    #[test]
    fn test_majority_vote_and_default() {
        assert_eq!(detect("bridal makeup kitna"), Language::RomanUrdu);
        // No signal at all: documented English default.
        assert_eq!(detect("bridal makeup package"), Language::English);
        assert_eq!(detect(""), Language::English);
        assert_eq!(detect("   "), Language::English);
    }

    #[test]
    fn test_history_majority_ties_to_urdu() {
        let history = vec![
            Message::user("bridal makeup ka price kya hai"),
            Message::assistant("Bridal makeup PKR 15,000 ka hai"),
            Message::user("manicure available?"),
        ];
        // One Urdu, one ambiguous-English user message: tie favors Urdu.
        assert_eq!(from_history(&history), Language::RomanUrdu);

        let english_only = vec![Message::user("what services do you offer")];
        assert_eq!(from_history(&english_only), Language::English);
        assert_eq!(from_history(&[]), Language::English);
    }
}

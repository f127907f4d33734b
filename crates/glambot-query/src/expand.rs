//! Retrieval query expansion.
//!
//! Embedding search over a small bilingual corpus misses when the query says
//! "kahan pr he" and the document says "location". Expansion appends intent
//! synonyms, recent conversation terms, and generic salon terms so the vector
//! lookup has anchors in both languages. The original query always comes
//! first in the output; the additions only widen recall.

use std::collections::HashSet;

use glambot_core::types::Message;
use tracing::debug;

use crate::intent::{self, Intent};

/// Queries shorter than this pull context terms from the conversation.
const SHORT_QUERY_CHARS: usize = 25;
/// Queries shorter than this additionally get generic salon anchors.
const TINY_QUERY_CHARS: usize = 15;
/// At most this many intent keywords are appended.
const MAX_INTENT_TERMS: usize = 10;
/// At most this many history-derived terms are appended.
const MAX_CONTEXT_TERMS: usize = 4;

/// Filler words that carry no retrieval signal, in either language.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of",
    "with", "ka", "ki", "ke", "ko", "se", "mein", "par", "hain", "hai", "ho",
    "he", "hen", "kya", "apka", "apke", "aap", "main", "mujhe", "mujhse",
];

const GENERIC_TERMS: &[&str] = &["salon", "service", "information"];

/// Build the retrieval query: the original text followed by expansion terms.
///
/// `normalized` must be the canonical form of `query`; dedup checks run
/// against it so that a term already present in any spelling is not added
/// twice.
pub fn expand(query: &str, normalized: &str, intent: Intent, history: &[Message]) -> String {
    let mut expanded = query.trim().to_string();
    let mut added: HashSet<String> = HashSet::new();

    let mut push_term = |expanded: &mut String, term: &str| {
        let lower = term.to_lowercase();
        if !normalized.contains(&lower) && !added.contains(&lower) {
            expanded.push(' ');
            expanded.push_str(term);
            added.insert(lower);
        }
    };

    // Intent synonyms: the leading catalog keywords plus all context words.
    for keyword in intent::catalog_keywords(intent).iter().take(MAX_INTENT_TERMS) {
        push_term(&mut expanded, keyword);
    }
    for context_word in intent::catalog_context(intent) {
        push_term(&mut expanded, context_word);
    }

    // Short or bare follow-ups ("aur facial?", "kahan pr he") inherit terms
    // from the recent conversation.
    let is_short = query.len() < SHORT_QUERY_CHARS
        || normalized.split_whitespace().any(|w| w == "he" || w == "hen");
    if is_short && !history.is_empty() {
        let context_text = history
            .iter()
            .rev()
            .take(6)
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        for term in content_words(&context_text).into_iter().take(MAX_CONTEXT_TERMS) {
            push_term(&mut expanded, &term);
        }
    }

    if query.len() < TINY_QUERY_CHARS {
        for term in GENERIC_TERMS {
            push_term(&mut expanded, term);
        }
    }

    debug!("🔍 expanded query: {expanded:?}");
    expanded
}

/// Unique non-stopword terms longer than 2 characters, in first-seen order.
fn content_words(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    for raw in text.split(|c: char| !c.is_alphanumeric()) {
        let word = raw.to_lowercase();
        if word.len() > 2 && !STOP_WORDS.contains(&word.as_str()) && seen.insert(word.clone()) {
            words.push(word);
        }
    }
    words
}

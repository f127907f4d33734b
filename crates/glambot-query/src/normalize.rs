//! Spelling canonicalization for colloquial Roman-Urdu/English queries.
//!
//! Keyword matching downstream only knows canonical spellings, so common
//! variants ("servis", "pric", "kaun si") are rewritten first. Replacements
//! are whole-word so the pass is idempotent: no canonical output form is
//! itself a key in the table.

use std::sync::LazyLock;

use regex::Regex;

/// variant -> canonical form. Keep keys whole words; a key that is a prefix
/// of its own replacement would loop under substring matching, which is why
/// this table is applied with `\b` anchors.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("servises", "services"),
    ("servis", "service"),
    ("servic", "service"),
    ("pric", "price"),
    ("prize", "price"),
    ("locatin", "location"),
    ("adress", "address"),
    ("addres", "address"),
    ("timimg", "timing"),
    ("fone", "phone"),
    ("phne", "phone"),
    ("mobail", "mobile"),
    ("pakage", "package"),
    ("packge", "package"),
    ("staf", "staff"),
    ("stylis", "stylist"),
    ("kaunsi", "konsi"),
    ("kaunse", "konse"),
    ("kaunsa", "konsa"),
    ("kaun", "kon"),
    ("hain", "hen"),
    ("hai", "he"),
];

static PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    REPLACEMENTS
        .iter()
        .map(|(variant, canonical)| {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(variant)))
                .unwrap_or_else(|e| panic!("bad normalization pattern {variant}: {e}"));
            (re, *canonical)
        })
        .collect()
});

/// Lowercase, collapse whitespace, and canonicalize spelling variants.
///
/// Idempotent: `normalize(normalize(q)) == normalize(q)`.
pub fn normalize(query: &str) -> String {
    let mut out = query.to_lowercase();
    for (re, canonical) in PATTERNS.iter() {
        out = re.replace_all(&out, *canonical).into_owned();
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spelling_variants() {
        assert_eq!(normalize("servis ka pric kya he"), "service ka price kya he");
        assert_eq!(normalize("kaunsi servises"), "konsi services");
        assert_eq!(normalize("salon ki locatin aur fone number"), "salon ki location aur phone number");
    }

    #[test]
    fn test_whole_word_only() {
        // "pricing" and "staffing" contain variant keys but are already fine.
        assert_eq!(normalize("pricing for staffing"), "pricing for staffing");
    }

    #[test]
    fn test_lowercase_and_whitespace() {
        assert_eq!(normalize("  Haircut   Price\tKYA  hai "), "haircut price kya he");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "servis ka pric kya hai",
            "kaun se packge available hain",
            "TIMIMG kya he aaj",
            "plain english question about services",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_canonical_forms_are_not_keys() {
        for (_, canonical) in REPLACEMENTS {
            assert!(
                !REPLACEMENTS.iter().any(|(k, _)| k == canonical),
                "{canonical} would be rewritten again"
            );
        }
    }
}

//! Keyword-scored intent classification.
//!
//! Intents form a closed set; every variant carries retrieval keywords,
//! context boosters, and a guidance string that steers answer generation.
//! Classification is substring scoring over the *normalized* query, so all
//! catalog entries are written in canonical spelling ("kon si", "he", "hen").

use glambot_core::types::Message;
use tracing::debug;

/// User intent, ordered by catalog priority. On a score tie the earlier
/// variant wins, so `Price` outranks everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Price,
    Service,
    Location,
    Timing,
    Contact,
    Package,
    Staff,
    Booking,
    Discount,
    General,
}

struct IntentPattern {
    intent: Intent,
    keywords: &'static [&'static str],
    context: &'static [&'static str],
}

/// Scoring catalog. Keywords in canonical (post-normalization) form only.
static CATALOG: &[IntentPattern] = &[
    IntentPattern {
        intent: Intent::Price,
        keywords: &[
            "price", "cost", "charge", "fee", "rate", "pricing", "charges",
            "fees", "rates", "how much", "what price", "what cost",
            "how much does", "how much is", "price of", "cost of",
            "charge for", "fee for", "kitna", "kitne", "kitni", "price kya",
            "cost kya", "charge kya", "kitna he", "kitne hen", "kitni he",
            "kitna lagta", "kitna hota", "price batao", "price bata",
            "price batayein", "price kya he", "prices batao", "prices bata",
            "prices kya hen", "kitna paisa", "kitna kharcha", "paisa",
            "kharcha", "chal rahi", "chal raha", "chal rahe", "kya price",
            "kya cost", "kya charge", "current price", "current prices",
        ],
        context: &[
            "package", "service", "services", "haircut", "facial", "manicure",
            "pedicure", "batao", "bata", "batayein",
        ],
    },
    IntentPattern {
        intent: Intent::Service,
        keywords: &[
            "service", "services", "what services", "which services",
            "what do you offer", "offerings", "what do you provide",
            "what can i get", "what treatments", "what options", "kon si",
            "konse", "konsa", "konsi", "services kya", "services kya hen",
            "kon kon si services", "services batao", "services bata",
            "services batayein", "kya services", "kya offer karte",
            "kya provide karte", "services hen", "services he",
        ],
        context: &["salon", "offer", "provide", "available", "hen"],
    },
    IntentPattern {
        intent: Intent::Location,
        keywords: &[
            "location", "address", "where", "where is", "where are you",
            "where are you located", "place", "address of", "location of",
            "where can i find", "kahan", "kahan pr", "kahan par", "kahan he",
            "kahan hen", "address kya", "address kya he", "location kya",
            "location kya he", "jagah", "jagah kya", "kahan located",
            "kahan situated", "kahan pr he", "kahan par he",
        ],
        context: &["salon", "shop", "store", "located", "situated", "find", "reach"],
    },
    IntentPattern {
        intent: Intent::Timing,
        keywords: &[
            "time", "timing", "timings", "hours", "when",
            "when are you open", "when do you open", "opening hours",
            "closing time", "operating hours", "business hours", "what time",
            "what hours", "what timing", "kab", "kab tak", "kab se",
            "kab open", "kab close", "kab khulta", "kab band hota",
            "timing kya", "timing kya he", "time kya", "time kya he", "waqt",
            "samay", "ghante", "hours kya", "kab khulta he", "kab tak khula",
        ],
        context: &["open", "close", "available", "operating", "khulta", "band"],
    },
    IntentPattern {
        intent: Intent::Contact,
        keywords: &[
            "phone", "number", "contact", "call", "mobile", "phone number",
            "contact number", "what is your phone", "what is your number",
            "how to contact", "how can i contact", "phone kya",
            "phone kya he", "number kya", "number kya he", "contact kya",
            "kaise contact", "kaise call", "mobile number", "phone batao",
            "number batao", "contact batao",
        ],
        context: &["call", "contact", "reach", "phone", "number"],
    },
    IntentPattern {
        intent: Intent::Package,
        keywords: &[
            "package", "packages", "what packages", "which packages",
            "package details", "package price", "package cost",
            "package information", "package kya", "packages kya",
            "package kya he", "packages kya hen", "kon se packages",
            "package batao", "packages batao", "package ka price",
        ],
        context: &[
            "price", "cost", "includes", "services", "bridal", "groom",
            "membership",
        ],
    },
    IntentPattern {
        intent: Intent::Staff,
        keywords: &[
            "staff", "stylist", "barber", "beauty expert", "who works",
            "who is your", "staff members", "team members", "employees",
            "staff kya", "staff kya he", "kon kon", "kon he", "staff batao",
            "stylist batao", "kon kon se staff",
        ],
        context: &["stylist", "barber", "expert", "staff", "team"],
    },
    IntentPattern {
        intent: Intent::Booking,
        keywords: &[
            "book", "booking", "appointment", "reserve", "reservation",
            "slot", "how to book", "how can i book", "can i book",
            "book an appointment", "book karo", "booking karo",
            "appointment lo", "slot lo", "kaise book", "kaise booking",
            "book kar sakte", "booking kar sakte",
        ],
        context: &["appointment", "slot", "reserve", "book", "available"],
    },
    IntentPattern {
        intent: Intent::Discount,
        keywords: &[
            "discount", "discounts", "offer", "offers", "promotion",
            "promotions", "special offer", "any discount", "any offer",
            "discount available", "discount kya", "discount kya he",
            "offer kya", "offer kya he", "kon se discount", "discount milta",
            "offer milta",
        ],
        context: &["discount", "offer", "promotion", "special", "available"],
    },
];

impl Intent {
    /// Generation guidance injected into the system prompt per intent.
    pub fn guidance(&self) -> &'static str {
        match self {
            Intent::Price => {
                "User is asking about prices. This is CRITICAL - you MUST provide prices \
                 from the salon data. If user asks \"price batao\" or \"prices chal rahi\" \
                 or \"kitna lagta\", they want to know CURRENT PRICES. Provide: 1) Service \
                 prices (all services with prices), 2) Package prices (all packages with \
                 prices), 3) Be comprehensive - if user asks for \"prices\" (plural) or \
                 \"saare prices\", list ALL prices. NEVER say \"information nahi hai\" for \
                 price queries - prices are ALWAYS in salon data."
            }
            Intent::Service => {
                "User is asking about services. List all available services with their \
                 details (name, price, duration). Be comprehensive and helpful."
            }
            Intent::Location => {
                "User is asking about location. Provide the complete address, landmark, \
                 and how to reach. Include contact information if relevant."
            }
            Intent::Timing => {
                "User is asking about timings. Provide opening hours, closing hours, and \
                 days when the salon is open or closed."
            }
            Intent::Contact => {
                "User is asking for contact information. Provide phone number, WhatsApp, \
                 email, and Instagram handle."
            }
            Intent::Package => {
                "User is asking about packages. List all packages with their prices, \
                 included services, and validity."
            }
            Intent::Staff => {
                "User is asking about staff. List all staff members with their roles, \
                 specialties, and experience."
            }
            Intent::Booking => {
                "User is asking about booking. Explain booking methods (phone, WhatsApp, \
                 walk-in) and advance booking recommendations."
            }
            Intent::Discount => {
                "User is asking about discounts. List all available discounts with their \
                 terms and conditions."
            }
            Intent::General => {
                "User query is general. Try to understand what they need and provide \
                 helpful information from the salon data."
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Price => "price",
            Intent::Service => "service",
            Intent::Location => "location",
            Intent::Timing => "timing",
            Intent::Contact => "contact",
            Intent::Package => "package",
            Intent::Staff => "staff",
            Intent::Booking => "booking",
            Intent::Discount => "discount",
            Intent::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn pattern_for(intent: Intent) -> Option<&'static IntentPattern> {
    CATALOG.iter().find(|p| p.intent == intent)
}

pub(crate) fn catalog_keywords(intent: Intent) -> &'static [&'static str] {
    pattern_for(intent).map(|p| p.keywords).unwrap_or(&[])
}

pub(crate) fn catalog_context(intent: Intent) -> &'static [&'static str] {
    pattern_for(intent).map(|p| p.context).unwrap_or(&[])
}

/// Score `query` (already normalized) against the catalog.
///
/// Longer keyword hits score higher (by byte length); context words add 2;
/// keywords seen in the last 4 history messages add 1. A strict maximum is
/// required to leave `General`; ties keep the earlier catalog entry.
pub fn classify(query: &str, history: &[Message]) -> Intent {
    let recent_context = if history.is_empty() {
        String::new()
    } else {
        history
            .iter()
            .rev()
            .take(4)
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut best = Intent::General;
    let mut best_score = 0usize;

    for pattern in CATALOG {
        let mut score = 0usize;
        for keyword in pattern.keywords {
            if query.contains(keyword) {
                score += keyword.len();
            }
        }
        for context_word in pattern.context {
            if query.contains(context_word) {
                score += 2;
            }
        }
        if !recent_context.is_empty() {
            for keyword in pattern.keywords {
                if recent_context.contains(keyword) {
                    score += 1;
                }
            }
        }
        if score > best_score {
            best_score = score;
            best = pattern.intent;
        }
    }

    debug!("🎯 intent={best} score={best_score} query={query:?}");
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn test_price_queries() {
        assert_eq!(classify(&normalize("haircut ka price kya hai"), &[]), Intent::Price);
        assert_eq!(classify(&normalize("how much is a facial"), &[]), Intent::Price);
        assert_eq!(classify(&normalize("kitna lagta hai manicure"), &[]), Intent::Price);
    }

    #[test]
    fn test_each_intent_reachable() {
        let cases = [
            ("what services do you offer", Intent::Service),
            ("salon kahan located hai", Intent::Location),
            ("kab open hota hai salon", Intent::Timing),
            ("phone number batao", Intent::Contact),
            ("bridal package details batao", Intent::Package),
            ("who is your stylist", Intent::Staff),
            ("how can i book an appointment", Intent::Booking),
            ("any discount available?", Intent::Discount),
        ];
        for (query, expected) in cases {
            assert_eq!(classify(&normalize(query), &[]), expected, "query: {query}");
        }
    }

    #[test]
    fn test_no_signal_is_general() {
        assert_eq!(classify(&normalize("hello there"), &[]), Intent::General);
        assert_eq!(classify("", &[]), Intent::General);
    }

    #[test]
    fn test_history_boost_breaks_ambiguity() {
        // Bare follow-up after a price exchange leans price-ward.
        let history = vec![
            Message::user("haircut ka price kya he"),
            Message::assistant("Haircut for men is PKR 500."),
        ];
        assert_eq!(classify(&normalize("aur facial?"), &history), Intent::Price);
    }

    #[test]
    fn test_keywords_are_canonical() {
        // The classifier sees normalized text, so catalog entries must
        // already be in normalized spelling.
        for pattern in CATALOG {
            for keyword in pattern.keywords.iter().chain(pattern.context) {
                assert_eq!(
                    normalize(keyword),
                    *keyword,
                    "catalog entry not canonical: {keyword}"
                );
            }
        }
    }

    #[test]
    fn test_guidance_is_specific() {
        assert!(Intent::Price.guidance().contains("prices"));
        assert!(Intent::Booking.guidance().contains("booking"));
        assert_ne!(Intent::Staff.guidance(), Intent::General.guidance());
    }
}

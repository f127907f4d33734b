//! Prompt assembly.
//!
//! The system message carries the assistant persona, the grounding rules,
//! the retrieved evidence, and a readable transcript of the conversation.
//! A synthetic user turn then names the one required output language, the
//! recent history rides along in structured form, and the current question
//! comes last, which is the shape OpenAI-compatible models are tuned for.

use glambot_core::config::SalonConfig;
use glambot_core::types::{Language, Message, Role};
use glambot_knowledge::Evidence;
use glambot_query::Intent;

/// How many history messages ride along as structured chat messages.
const HISTORY_WINDOW: usize = 8;

/// Everything a single turn needs to become a message list.
pub struct PromptInputs<'a> {
    pub salon: &'a SalonConfig,
    pub query: &'a str,
    pub language: Language,
    pub intent: Intent,
    pub evidence: &'a Evidence,
    pub history: &'a [Message],
}

fn format_history(history: &[Message]) -> String {
    if history.is_empty() {
        return "No previous conversation.".to_string();
    }
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..]
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::User => "User",
                _ => "Assistant",
            };
            format!("{speaker}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_evidence(evidence: &Evidence) -> String {
    evidence
        .chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[Context {}]: {}", i + 1, chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The single explicit language directive for this turn. Exactly one of the
/// two variants is ever in play.
fn language_directive(language: Language) -> String {
    match language {
        Language::RomanUrdu => {
            "IMPORTANT: Respond ONLY in Roman Urdu (Urdu written with English \
             letters). Do NOT answer in plain English."
                .to_string()
        }
        Language::English => "IMPORTANT: Respond ONLY in English.".to_string(),
    }
}

fn system_prompt(inputs: &PromptInputs<'_>) -> String {
    let salon = inputs.salon;
    format!(
        "You are a friendly and helpful AI assistant for {name}, a premium salon in \
{location}. Your name is Salon Assistant and you love helping customers!

PERSONALITY:
- Very friendly, warm, and welcoming (like a good friend)
- Use conversational, natural language
- Be enthusiastic and helpful
- Show genuine interest in helping customers
- Use phrases like \"Ji bilkul!\", \"Zaroor!\", \"Bilkul!\", \"Aap batayen\" in Roman Urdu
- Use phrases like \"Absolutely!\", \"Of course!\", \"Sure thing!\" in English

CRITICAL RULES:
1. ONLY use information from the PROVIDED CONTEXT below
2. If information is not in context, be helpful and say: \"Mujhe yeh specific \
information nahi hai, lekin main aapki madad kar sakta hoon. Aap {phone} par call \
karke detailed information le sakte hain. Ya phir aap mujhse koi aur sawal pooch \
sakte hain!\" (Roman Urdu) or \"I don't have that specific information, but I'd be \
happy to help! You can call us at {phone} for detailed information, or feel free to \
ask me anything else!\" (English)
3. NEVER invent prices, timings, or service details
4. Respond in the language named by the user's language instruction:
   - Roman Urdu query → Roman Urdu response (use natural conversational style: \
\"aap\", \"mera\", \"kya\", \"hai\", \"hain\", \"ji\", \"bilkul\")
   - English query → English response
5. Be friendly, warm, and conversational - like talking to a friend
6. Use emojis naturally (1-2 per response max) - 😊 ✨ 💇‍♀️ 💅
7. Always offer to help further at the end with enthusiasm
8. When listing services, be comprehensive and helpful
9. If asked \"kon kon si services hain?\" or \"what services do you offer?\", \
provide a complete list from context

RESPONSE GUIDANCE: {guidance}

CONTEXT FROM KNOWLEDGE BASE:
{context}

CONVERSATION HISTORY:
{history}

Respond naturally, accurately, and with enthusiasm based ONLY on the context \
provided. Be friendly and helpful like a good friend would be!",
        name = salon.name,
        location = salon.location,
        phone = salon.phone,
        guidance = inputs.intent.guidance(),
        context = format_evidence(inputs.evidence),
        history = format_history(inputs.history),
    )
}

/// Build the full message list for one chat completion: system prompt, the
/// language directive as a synthetic user turn, the recent history, then the
/// current query.
pub fn build_messages(inputs: &PromptInputs<'_>) -> Vec<Message> {
    let mut messages = Vec::with_capacity(inputs.history.len().min(HISTORY_WINDOW) + 3);
    messages.push(Message::system(system_prompt(inputs)));
    messages.push(Message::user(language_directive(inputs.language)));

    let start = inputs.history.len().saturating_sub(HISTORY_WINDOW);
    messages.extend(inputs.history[start..].iter().cloned());

    messages.push(Message::user(inputs.query));
    messages
}

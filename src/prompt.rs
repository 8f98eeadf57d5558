//! The prompt module embeds the user's instruction and document into the instruction template.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::constants::{DEFAULT_PROMPT_TEMPLATE, DEFAULT_USER_PROMPT};

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(prompt|text)\}").expect("Failed to compile placeholder regex"));

/// A prompt ready to be sent: the instruction message and, when the template has no
/// `{text}` placeholder, the document as a separate message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub instruction: String,
    pub document: Option<String>,
}

/// Builds the prompt for a deck request.
///
/// `{prompt}` is replaced with the user's instruction (or a default one when it is blank)
/// and `{text}` with the document text, both in a single pass so neither value is searched
/// for placeholders. A template without `{prompt}` gets the instruction prepended.
pub fn build_prompt(template: Option<&str>, prompt: &str, document_text: &str) -> BuiltPrompt {
    let template = template.unwrap_or(DEFAULT_PROMPT_TEMPLATE);
    let prompt = match prompt.trim() {
        "" => DEFAULT_USER_PROMPT,
        prompt => prompt,
    };

    let filled = PLACEHOLDER_REGEX.replace_all(template, |captures: &Captures| {
        match captures.get(1).map(|found| found.as_str()) {
            Some("prompt") => prompt.to_owned(),
            _ => document_text.to_owned(),
        }
    });

    let instruction = if template.contains("{prompt}") {
        filled.into_owned()
    } else {
        format!("{prompt}\n\n{filled}")
    };

    let document = (!template.contains("{text}")).then(|| document_text.to_owned());

    BuiltPrompt {
        instruction,
        document,
    }
}

//! The generate module sends a deck request to an LLM model and parses the reply into slides.

use anyhow::{Context, Result};
use llm::LLMProvider;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, ChatMessageBuilder, ChatProvider};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;
use url::Url;

use crate::constants::{MODEL_API_KEY_ENV_NAME, THINK_STRIPPER};
use crate::parse::parse_slides;
use crate::prompt::build_prompt;
use crate::slide::Slide;

static THINK_STRIPPER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(THINK_STRIPPER).expect("Failed to compile THINK_STRIPPER regex"));

/// Shared data for a generation request
pub struct GenerateContext<'a> {
    /// LLM model that writes the slides
    pub model: &'a dyn ChatProvider,
    /// Prompt template to use instead of the built-in one
    pub prompt_template: Option<&'a str>,
}

/// Builds an LLM provider from a model URL such as `openai://gpt-4o-mini` or `ollama://llama3:8b`.
///
/// The URL scheme selects the backend, the host is the model name and the optional
/// username part becomes the model tag. The API key is read from the environment.
///
/// # Errors
///
/// Returns an error if:
/// * The model URL cannot be parsed or has no host
/// * The backend is unknown
/// * The provider fails to build
pub fn build_model(model: &str, max_tokens: u32) -> Result<Box<dyn LLMProvider>> {
    let model_url = Url::parse(model).map_err(|e| anyhow::anyhow!("Invalid model URL: {}", e))?;
    let llm_builder = LLMBuilder::new()
        .backend(
            LLMBackend::from_str(model_url.scheme())
                .map_err(|e| anyhow::anyhow!("Invalid LLM backend: {}", e))?,
        )
        .model(
            [
                model_url
                    .host_str()
                    .context("Specify model name as host URL.")?,
                model_url.username(),
            ]
            .iter()
            .filter(|x| !x.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(":"),
        )
        .max_tokens(max_tokens);

    let llm_builder = match std::env::var(MODEL_API_KEY_ENV_NAME) {
        Ok(model_key) => {
            info!("API key is provided via {MODEL_API_KEY_ENV_NAME}");
            llm_builder.api_key(model_key)
        }
        Err(err) => {
            info!("{err} while providing api key");
            llm_builder
        }
    };

    llm_builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build LLM model: {}", e))
}

/// Sends the document and prompt to the model and returns its reply with reasoning blocks removed.
///
/// # Arguments
///
/// * `document_text` - The free text the deck is about
/// * `prompt` - The user's instruction for the deck
/// * `ctx` - Context containing the model and prompt template
///
/// # Errors
///
/// Returns an error if the LLM chat operation fails
pub async fn request_completion(
    document_text: &str,
    prompt: &str,
    ctx: &GenerateContext<'_>,
) -> Result<String> {
    let built = build_prompt(ctx.prompt_template, prompt, document_text);

    let mut messages: Vec<ChatMessageBuilder> =
        vec![ChatMessage::user().content(built.instruction)];

    if let Some(document) = built.document {
        messages.push(ChatMessage::user().content(document));
    }

    let messages: Vec<ChatMessage> = messages
        .into_iter()
        .map(|message| message.build())
        .collect();

    let response = ctx
        .model
        .chat(&messages)
        .await
        .map_err(|err| anyhow::anyhow!("LLM error: {err}."))?
        .to_string();

    let reply = THINK_STRIPPER_REGEX
        .replace_all(&response, "")
        .trim()
        .to_owned();

    debug!("LLM replied with {} characters", reply.len());
    Ok(reply)
}

/// Asks the model for a deck and parses its reply into slides.
///
/// A reply that cannot be parsed is not an error; it simply yields fewer slides or none.
///
/// # Errors
///
/// Returns an error if the LLM chat operation fails
pub async fn generate_slides(
    document_text: &str,
    prompt: &str,
    ctx: &GenerateContext<'_>,
) -> Result<Vec<Slide>> {
    let reply = request_completion(document_text, prompt, ctx).await?;
    let slides = parse_slides(&reply);
    info!("Generated {} slides", slides.len());
    Ok(slides)
}

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use deckgen::web::AppState;
use llm::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Tool},
    error::LLMError,
};

/// Generates one test per case: the stub model answers with `response` and the
/// generated slides must carry exactly the titles in `titles`.
#[macro_export]
macro_rules! assert_generated_titles {
    (
        $(
            $test_name:ident : response => $response:expr, titles => [$($title:expr),* $(,)?]
        ),+ $(,)?
    ) => {
        $(
            #[tokio::test]
            async fn $test_name() {
                let model = StubLlmProvider::new($response);
                let context = deckgen::generate::GenerateContext {
                    model: &model,
                    prompt_template: None,
                };
                let slides = deckgen::generate::generate_slides("document", "", &context)
                    .await
                    .expect("Expected successful generation.");
                let titles: Vec<String> = slides.into_iter().map(|slide| slide.title).collect();
                let expected: Vec<String> = vec![$($title.to_owned()),*];

                assert_that(&titles).is_equal_to(expected);
            }
        )+
    }
}

/// A chat model that answers every request with a fixed reply and remembers what it was sent.
pub struct StubLlmProvider {
    response_content: Option<String>,
    received: Mutex<Vec<Vec<String>>>,
}

impl StubLlmProvider {
    pub fn new(response_content: &str) -> Self {
        StubLlmProvider {
            response_content: Some(response_content.to_owned()),
            received: Mutex::new(Vec::new()),
        }
    }

    /// A model whose every request fails.
    pub fn failing() -> Self {
        StubLlmProvider {
            response_content: None,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Message contents of every request received so far.
    pub fn received(&self) -> Vec<Vec<String>> {
        self.received.lock().expect("Stub mutex poisoned").clone()
    }
}

impl ChatProvider for StubLlmProvider {
    fn chat<'life0, 'life1, 'async_trait>(
        &'life0 self,
        messages: &'life1 [ChatMessage],
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            #[derive(Debug)]
            struct StringResponse(String);

            impl ChatResponse for StringResponse {
                fn text(&self) -> Option<String> {
                    Some(self.0.clone())
                }

                fn tool_calls(&self) -> Option<Vec<llm::ToolCall>> {
                    panic!()
                }

                fn thinking(&self) -> Option<String> {
                    None
                }

                fn usage(&self) -> Option<llm::chat::Usage> {
                    None
                }
            }

            impl std::fmt::Display for StringResponse {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(formatter, "{}", self.0)
                }
            }

            self.received
                .lock()
                .expect("Stub mutex poisoned")
                .push(messages.iter().map(|message| message.content.clone()).collect());

            match &self.response_content {
                Some(content) => {
                    Ok(Box::new(StringResponse(content.clone())) as Box<dyn ChatResponse>)
                }
                None => Err(LLMError::ProviderError("stub model is down".to_owned())),
            }
        })
    }

    fn chat_with_tools<'life0, 'life1, 'life2, 'async_trait>(
        &'life0 self,
        _messages: &'life1 [ChatMessage],
        _tools: Option<&'life2 [Tool]>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        'life2: 'async_trait,
        Self: 'async_trait,
    {
        panic!()
    }
}

pub const THREE_SLIDE_REPLY: &str = "Slide 1: Why Rust\nMemory safety without a garbage collector\n- Ownership\n- Borrowing\n\nSlide 2: Tooling\n- Cargo\n- Clippy\n\nSlide 3: Next steps\nStart with a small service";

/// Application state backed by a stub model answering with `reply`.
pub fn stub_state(reply: &str) -> (AppState, Arc<StubLlmProvider>) {
    let model = Arc::new(StubLlmProvider::new(reply));
    (AppState::new(model.clone(), None), model)
}

pub fn failing_state() -> AppState {
    AppState::new(Arc::new(StubLlmProvider::failing()), None)
}

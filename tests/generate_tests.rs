use crate::extras::{StubLlmProvider, THREE_SLIDE_REPLY};
use deckgen::generate::{GenerateContext, generate_slides, request_completion};
use deckgen::prompt::build_prompt;
use spectral::prelude::*;

mod extras;

assert_generated_titles![
    plain_reply_parsed:
        response => THREE_SLIDE_REPLY,
        titles => ["Why Rust", "Tooling", "Next steps"],
    filled_think_removed:
        response => "<think>Plan: Slide 9: Hidden\n- not shown</think>\nSlide 1: Visible\n- Shown",
        titles => ["Visible"],
    empty_think_removed:
        response => "<think>\n</think>\nSlide 1: Visible\n- Shown",
        titles => ["Visible"],
    unstructured_reply_yields_nothing:
        response => "I'm sorry, I can't help with that.",
        titles => [],
];

#[tokio::test]
async fn default_template_embeds_prompt_and_document_in_one_message() {
    let model = StubLlmProvider::new(THREE_SLIDE_REPLY);
    let context = GenerateContext {
        model: &model,
        prompt_template: None,
    };

    generate_slides("Rust is a systems language.", "Three slides for managers", &context)
        .await
        .expect("Expected successful generation.");

    let received = model.received();
    assert_that(&received).has_length(1);
    let messages = &received[0];
    assert_that(messages).has_length(1);
    assert_that(&messages[0]).contains("Three slides for managers");
    assert_that(&messages[0]).contains("Rust is a systems language.");
    assert_that(&messages[0]).contains("Slide 1: <title>");
}

#[tokio::test]
async fn template_without_text_placeholder_sends_document_separately() {
    let model = StubLlmProvider::new(THREE_SLIDE_REPLY);
    let context = GenerateContext {
        model: &model,
        prompt_template: Some("Make slides. {prompt}"),
    };

    generate_slides("The document.", "Be brief.", &context)
        .await
        .expect("Expected successful generation.");

    let received = model.received();
    assert_that(&received[0]).is_equal_to(vec![
        "Make slides. Be brief.".to_owned(),
        "The document.".to_owned(),
    ]);
}

#[tokio::test]
async fn raw_completion_is_trimmed() {
    let model = StubLlmProvider::new("\n\n  Slide 1: A\n- b  \n\n");
    let context = GenerateContext {
        model: &model,
        prompt_template: None,
    };

    let reply = request_completion("doc", "", &context)
        .await
        .expect("Expected successful completion.");

    assert_that(&reply).is_equal_to("Slide 1: A\n- b".to_owned());
}

#[tokio::test]
async fn model_errors_propagate() {
    let model = StubLlmProvider::failing();
    let context = GenerateContext {
        model: &model,
        prompt_template: None,
    };

    let result = generate_slides("doc", "", &context).await;

    assert_that(&result.is_err()).is_true();
    let message = result.err().map(|err| err.to_string()).unwrap_or_default();
    assert_that(&message).contains("stub model is down");
}

#[test]
fn blank_prompt_falls_back_to_default_instruction() {
    let built = build_prompt(None, "   ", "Body text");

    assert_that(&built.instruction).contains("Create a presentation summarising the following document.");
    assert_that(&built.instruction).contains("Body text");
    assert_that(&built.document).is_none();
}

#[test]
fn placeholders_inside_the_prompt_are_not_expanded() {
    let built = build_prompt(Some("Do this: {prompt}\n{text}"), "Quote {text} literally", "Body text");

    assert_that(&built.instruction).is_equal_to("Do this: Quote {text} literally\nBody text".to_owned());
}

#[test]
fn template_without_prompt_placeholder_keeps_the_instruction() {
    let built = build_prompt(Some("Slides please.\n{text}"), "Two slides only", "Body text");

    assert_that(&built.instruction).is_equal_to("Two slides only\n\nSlides please.\nBody text".to_owned());
    assert_that(&built.document).is_none();
}

//! deckgen turns free text into a slide deck with the help of an LLM model.
//!
//! The tool has three commands:
//! 1. `serve` - Runs the web front end: form, preview, edit and export
//! 2. `generate` - Runs the same pipeline from the command line and writes a `.pptx` file
//! 3. `render` - Builds a `.pptx` file from a saved model reply without calling a model

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Parser, Subcommand};
use env_logger::Builder;
use llm::LLMProvider;
use llm::chat::ChatProvider;
use log::{LevelFilter, info, warn};

use deckgen::{
    DeckWriter, GenerateContext, Theme,
    constants::{DEFAULT_BIND_ADDRESS, DEFAULT_MAX_TOKENS, DEFAULT_SESSION_IDLE_MINUTES},
    generate::{build_model, generate_slides, request_completion},
    parse::parse_slides,
    web::{self, AppState},
};

/// Turn free text into a slide deck using an LLM
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute (serve, generate or render)
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", global = true, default_value_t = 2)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web front end
    Serve {
        /// URL of the LLM model to use, e.g. openai://gpt-4o-mini
        model: String,
        /// Address to listen on
        #[arg(long, short, default_value = DEFAULT_BIND_ADDRESS)]
        bind: String,
        /// Path to the file with a prompt template
        #[arg(long, short = 'p')]
        prompt_file: Option<String>,
        /// Maximum number of tokens the model may answer with
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        /// Minutes a session may stay unused before its slides are dropped
        #[arg(long, default_value_t = DEFAULT_SESSION_IDLE_MINUTES)]
        session_idle_minutes: u32,
    },
    /// Generate a presentation from a text file
    Generate {
        /// URL of the LLM model to use, e.g. openai://gpt-4o-mini
        model: String,
        /// Path to the document to build slides from
        input_file: String,
        /// Path to the presentation file to write
        output_file: String,
        /// Instruction for the deck
        #[arg(long, default_value = "")]
        prompt: String,
        /// Deck theme: "default" or "dark"
        #[arg(long, short = 't', default_value = "default")]
        theme: Theme,
        /// Path to the file with a prompt template
        #[arg(long, short = 'p')]
        prompt_file: Option<String>,
        /// Maximum number of tokens the model may answer with
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        /// Print the model's reply instead of writing a presentation
        #[arg(long)]
        raw: bool,
    },
    /// Build a presentation from a saved model reply
    Render {
        /// Path to the file with the model's reply
        reply_file: String,
        /// Path to the presentation file to write
        output_file: String,
        /// Deck theme: "default" or "dark"
        #[arg(long, short = 't', default_value = "default")]
        theme: Theme,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Command::Serve {
            model,
            bind,
            prompt_file,
            max_tokens,
            session_idle_minutes,
        } => {
            let options = ServeOptions {
                bind,
                prompt_file,
                max_tokens,
                session_idle: Duration::minutes(i64::from(session_idle_minutes)),
            };
            handle_serve_command(model, options).await
        }
        Command::Generate {
            model,
            input_file,
            output_file,
            prompt,
            theme,
            prompt_file,
            max_tokens,
            raw,
        } => {
            let request = GenerateRequest {
                model,
                input_file,
                output_file,
                prompt,
                theme,
                prompt_file,
                max_tokens,
                raw,
            };
            handle_generate_command(request).await
        }
        Command::Render {
            reply_file,
            output_file,
            theme,
        } => handle_render_command(reply_file, output_file, theme),
    }
}

struct ServeOptions {
    bind: String,
    prompt_file: Option<String>,
    max_tokens: u32,
    session_idle: Duration,
}

struct GenerateRequest {
    model: String,
    input_file: String,
    output_file: String,
    prompt: String,
    theme: Theme,
    prompt_file: Option<String>,
    max_tokens: u32,
    raw: bool,
}

fn read_prompt_template(prompt_file: Option<String>) -> Result<Option<String>> {
    match prompt_file {
        Some(file) => {
            let content =
                fs::read_to_string(&file).context(format!("Failed to read prompt file: {file}"))?;
            Ok(Some(content))
        }
        None => Ok(None),
    }
}

async fn handle_serve_command(model: String, options: ServeOptions) -> Result<()> {
    let provider: Arc<dyn LLMProvider> = Arc::from(build_model(&model, options.max_tokens)?);
    let chat: Arc<dyn ChatProvider> = provider;
    let prompt_template = read_prompt_template(options.prompt_file)?;

    info!("Serving decks generated by {model}");
    web::serve(
        AppState::new(chat, prompt_template),
        &options.bind,
        options.session_idle,
    )
    .await
}

async fn handle_generate_command(request: GenerateRequest) -> Result<()> {
    let model = build_model(&request.model, request.max_tokens)?;
    let prompt_template = read_prompt_template(request.prompt_file)?;
    let document_text = fs::read_to_string(&request.input_file)
        .context(format!("Failed to read input file: {}", request.input_file))?;

    let ctx = GenerateContext {
        model: model.as_ref(),
        prompt_template: prompt_template.as_deref(),
    };

    if request.raw {
        let reply = request_completion(&document_text, &request.prompt, &ctx).await?;
        println!("{reply}");
        return Ok(());
    }

    let slides = generate_slides(&document_text, &request.prompt, &ctx).await?;
    if slides.is_empty() {
        warn!("The model's reply contained no slides; writing an empty presentation");
    }

    DeckWriter::new(request.theme).write_to_path(&slides, &request.output_file)
}

fn handle_render_command(reply_file: String, output_file: String, theme: Theme) -> Result<()> {
    let reply = fs::read_to_string(&reply_file)
        .context(format!("Failed to read reply file: {reply_file}"))?;
    let slides = parse_slides(&reply);
    if slides.is_empty() {
        warn!("No slides found in {reply_file}; writing an empty presentation");
    }

    DeckWriter::new(theme).write_to_path(&slides, &output_file)
}

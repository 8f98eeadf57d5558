//! The web module exposes the form, preview, edit and export routes.

mod pages;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Form, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Duration;
use llm::chat::ChatProvider;
use log::{error, info, warn};
use serde::Deserialize;
use std::sync::Arc;

use crate::constants::{DECK_FILE_NAME, PPTX_MIME_TYPE, SESSION_SWEEP_INTERVAL};
use crate::deck::{DeckWriter, Theme};
use crate::generate::{GenerateContext, generate_slides};
use crate::parse::parse_slides;
use crate::slide::Slide;
use crate::session::{
    SessionData, SessionId, SessionStore, expired_session_cookie, session_cookie,
    session_id_from_headers,
};

type HandlerError = (StatusCode, String);

/// Shared state of the web front end.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ChatProvider>,
    pub prompt_template: Option<Arc<str>>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(model: Arc<dyn ChatProvider>, prompt_template: Option<String>) -> Self {
        Self {
            model,
            prompt_template: prompt_template.map(Arc::from),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    fn session(&self, headers: &HeaderMap) -> Option<(SessionId, SessionData)> {
        let id = session_id_from_headers(headers)?;
        self.sessions.get(&id).map(|data| (id, data))
    }
}

#[derive(Deserialize)]
struct GenerateForm {
    #[serde(default)]
    document_text: String,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    theme: String,
}

#[derive(Deserialize)]
struct EditForm {
    #[serde(default)]
    slides_text: String,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/static/style.css", get(style))
        .route("/generate_slides", post(generate_slides_handler))
        .route("/preview", get(preview_handler))
        .route("/edit", post(edit_handler))
        .route("/export", get(export_handler))
        .route("/slides.json", get(slides_json_handler))
        .route("/reset", post(reset_handler))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
}

/// Binds `address` and serves the application until the process stops.
///
/// Sessions left idle for longer than `session_idle` are dropped by a background sweep.
///
/// # Errors
///
/// Returns an error if:
/// * The address cannot be bound
/// * The server fails while running
pub async fn serve(state: AppState, address: &str, session_idle: Duration) -> Result<()> {
    spawn_session_sweeper(state.sessions.clone(), session_idle);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .context(format!("Failed to bind {address}"))?;
    info!("Listening on http://{address}");

    axum::serve(listener, router(state))
        .await
        .context("Server stopped with an error")
}

fn spawn_session_sweeper(sessions: Arc<SessionStore>, max_idle: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let expired = sessions.expire_idle(max_idle);
            if expired > 0 {
                info!("Expired {expired} idle sessions, {} left", sessions.len());
            }
        }
    });
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    info!("{method} {uri} -> {}", response.status());
    response
}

async fn index() -> Html<&'static str> {
    Html(pages::INDEX)
}

async fn health() -> &'static str {
    "OK"
}

async fn style() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], pages::STYLE)
}

async fn generate_slides_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<GenerateForm>,
) -> Result<Response, HandlerError> {
    if form.document_text.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "document_text must not be empty".to_owned(),
        ));
    }

    let theme = form.theme.parse::<Theme>().unwrap_or_else(|err| {
        warn!("{err}, falling back to the default theme");
        Theme::Default
    });

    let ctx = GenerateContext {
        model: state.model.as_ref(),
        prompt_template: state.prompt_template.as_deref(),
    };

    let slides = generate_slides(&form.document_text, &form.prompt, &ctx)
        .await
        .map_err(|err| {
            error!("Slide generation failed: {err}");
            (StatusCode::BAD_GATEWAY, err.to_string())
        })?;

    let page = pages::preview_page(&slides, theme);
    let data = SessionData { slides, theme };

    let id = match session_id_from_headers(&headers) {
        Some(id) if state.sessions.replace(&id, data.clone()) => id,
        _ => state.sessions.create(data),
    };

    Ok(([(header::SET_COOKIE, session_cookie(&id))], Html(page)).into_response())
}

async fn preview_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.session(&headers) {
        Some((_, data)) => Html(pages::preview_page(&data.slides, data.theme)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

async fn edit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<EditForm>,
) -> Result<Html<String>, HandlerError> {
    let (id, data) = state.session(&headers).ok_or_else(no_session)?;

    let slides = parse_slides(&form.slides_text);
    info!("Session {id} edited to {} slides", slides.len());

    let page = pages::preview_page(&slides, data.theme);
    if !state.sessions.replace_slides(&id, slides) {
        return Err(no_session());
    }
    Ok(Html(page))
}

async fn export_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let (_, data) = state.session(&headers).ok_or_else(no_session)?;

    let deck = DeckWriter::new(data.theme)
        .write(&data.slides)
        .map_err(|err| {
            error!("Failed to write deck: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to write presentation: {err}"),
            )
        })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, PPTX_MIME_TYPE.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DECK_FILE_NAME}\""),
            ),
        ],
        deck,
    )
        .into_response())
}

async fn slides_json_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Slide>>, HandlerError> {
    let (_, data) = state.session(&headers).ok_or_else(no_session)?;
    Ok(Json(data.slides))
}

async fn reset_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id_from_headers(&headers)
        && state.sessions.remove(&id).is_some()
    {
        info!("Session {id} discarded");
    }

    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

fn no_session() -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        "No slides in this session. Generate a deck first.".to_owned(),
    )
}

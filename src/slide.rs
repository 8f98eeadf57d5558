//! The slide module holds the slide record produced by parsing an LLM reply.

use serde::{Deserialize, Serialize};

/// A single slide: a title plus body content and its bullets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Slide title, shown in the title placeholder.
    pub title: String,
    /// Subtitle and bullets joined by newlines.
    pub content: String,
    /// Bullet lines in order, without their markers.
    pub bullets: Vec<String>,
}

impl Slide {
    /// Builds a slide from its parts, assembling `content` as the subtitle followed by the bullets.
    pub fn new(title: &str, subtitle: Option<&str>, bullets: Vec<String>) -> Self {
        let content = subtitle
            .map(str::trim)
            .filter(|subtitle| !subtitle.is_empty())
            .into_iter()
            .chain(bullets.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            title: title.trim().to_owned(),
            content,
            bullets,
        }
    }

    /// The subtitle line, if the content has one ahead of the bullets.
    pub fn subtitle(&self) -> Option<&str> {
        if self.content.lines().count() > self.bullets.len() {
            self.content.lines().next()
        } else {
            None
        }
    }

    /// Renders the slide back into the `Slide N: Title` markup that [`crate::parse::parse_slides`] reads.
    pub fn to_markup(&self, ordinal: usize) -> String {
        let mut lines = vec![format!("Slide {ordinal}: {}", self.title)];

        if self.bullets.is_empty() {
            lines.extend(self.content.lines().map(str::to_owned));
        } else {
            lines.extend(self.subtitle().map(str::to_owned));
            lines.extend(self.bullets.iter().map(|bullet| format!("- {bullet}")));
        }

        lines.join("\n")
    }
}

/// Renders a whole deck as markup, one blank line between slides.
pub fn slides_to_markup(slides: &[Slide]) -> String {
    slides
        .iter()
        .enumerate()
        .map(|(index, slide)| slide.to_markup(index + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}

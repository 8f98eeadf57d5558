//! The parse module turns the loosely structured text an LLM returns into slide records.
//!
//! The expected shape is a `Slide N: Title` header line, an optional subtitle line and
//! bullet lines, with blank lines between slides. Nothing here is a grammar: every rule
//! is best effort, and text that fits none of them is dropped rather than reported.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{BULLET_MARKERS, EMPHASIS_MARKERS, SLIDE_HEADER};
use crate::slide::Slide;

static SLIDE_HEADER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(SLIDE_HEADER).expect("Failed to compile SLIDE_HEADER regex"));

/// Lines collected for one slide before it is assembled.
#[derive(Debug, Default)]
struct SlideDraft {
    title: String,
    subtitle: Vec<String>,
    bullets: Vec<String>,
}

impl SlideDraft {
    fn new(title: String) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    fn absorb<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            if let Some(bullet) = strip_bullet(line) {
                if !bullet.is_empty() {
                    self.bullets.push(bullet.to_owned());
                }
            } else if self.title.is_empty() {
                self.title = clean_line(line).to_owned();
            } else {
                let text = clean_line(strip_subtitle_label(clean_line(line)));
                if !text.is_empty() {
                    self.subtitle.push(text.to_owned());
                }
            }
        }
    }

    fn finish(self) -> Option<Slide> {
        let subtitle = self.subtitle.join(" ");
        let slide = Slide::new(&self.title, Some(&subtitle), self.bullets);

        if slide.title.is_empty() || slide.content.trim().is_empty() {
            debug!("Dropping incomplete slide {:?}", slide.title);
            return None;
        }

        Some(slide)
    }
}

/// Parses an LLM reply into slides.
///
/// Sections are separated by blank lines. When at least one section opens with a
/// `Slide` header, only those sections become slides and bullet-only sections that
/// follow one are folded into it. Without any header every section is a slide whose
/// first line is the title.
pub fn parse_slides(response: &str) -> Vec<Slide> {
    let normalized = response.replace("\r\n", "\n");
    let sections = split_sections(&normalized);
    let has_headers = sections
        .iter()
        .filter_map(|section| section.first())
        .any(|line| header_title(line).is_some());

    let mut drafts: Vec<SlideDraft> = Vec::new();

    for section in &sections {
        let Some((first, rest)) = section.split_first() else {
            continue;
        };

        if !has_headers {
            let mut draft = SlideDraft::default();
            draft.absorb(section.iter().copied());
            drafts.push(draft);
            continue;
        }

        if let Some(title) = header_title(first) {
            let mut draft = SlideDraft::new(title);
            draft.absorb(rest.iter().copied());
            drafts.push(draft);
        } else if section.iter().all(|line| strip_bullet(line).is_some()) {
            if let Some(previous) = drafts.last_mut() {
                previous.absorb(section.iter().copied());
            }
        } else {
            debug!("Skipping section outside of any slide: {first:?}");
        }
    }

    let slides: Vec<Slide> = drafts.into_iter().filter_map(SlideDraft::finish).collect();
    debug!(
        "Parsed {} slides from {} sections",
        slides.len(),
        sections.len()
    );
    slides
}

/// Splits text into groups of non-blank lines.
fn split_sections(text: &str) -> Vec<Vec<&str>> {
    let mut sections = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }

    if !current.is_empty() {
        sections.push(current);
    }

    sections
}

/// Returns the title carried by a `Slide N: Title` header, or `None` if the line is not a header.
fn header_title(line: &str) -> Option<String> {
    let line = unwrap_emphasis(line.trim().trim_start_matches('#'));
    let captures = SLIDE_HEADER_REGEX.captures(line)?;
    let group = |name: &str| captures.name(name).map_or("", |found| found.as_str());

    let (open, close, title) = (group("open"), group("close"), group("title").trim());
    let has_number = captures.name("number").is_some();
    let has_separator = captures.name("separator").is_some();

    if !has_number && !has_separator && !title.is_empty() {
        return None;
    }

    // `**Slide 2:** Details` closes the emphasis after the separator
    let title = if !open.is_empty() && close.is_empty() && has_separator {
        title.strip_prefix(open).unwrap_or(title).to_owned()
    } else if open.is_empty() && !has_separator {
        format!("{close}{title}")
    } else {
        title.to_owned()
    };

    Some(clean_line(&title).to_owned())
}

/// Returns the bullet text if the line starts with a bullet marker followed by whitespace.
fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    let marker = chars.next()?;

    if !BULLET_MARKERS.contains(&marker) {
        return None;
    }

    let rest = chars.as_str();
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Strips heading hashes and emphasis wrapping the whole line, as in `## **Intro**`.
///
/// Stops before a step that would leave a bullet line behind, so `*- note*` stays as it is
/// and reads back the same way from markup.
fn clean_line(line: &str) -> &str {
    let mut text = line.trim();

    loop {
        let next = unwrap_emphasis(text.trim_start_matches('#'));
        if next == text || strip_bullet(next).is_some() {
            return text;
        }
        text = next;
    }
}

/// Removes one pair of emphasis markers around the whole text. Inline emphasis such as
/// `Why **Rust**` is left alone.
fn unwrap_emphasis(text: &str) -> &str {
    let text = text.trim();

    EMPHASIS_MARKERS
        .iter()
        .find_map(|marker| {
            let inner = text.strip_prefix(marker)?.strip_suffix(marker)?.trim();
            (!inner.is_empty() && !inner.contains(marker)).then_some(inner)
        })
        .unwrap_or(text)
}

fn strip_subtitle_label(line: &str) -> &str {
    match line.split_once(':') {
        Some((label, rest))
            if label.trim().eq_ignore_ascii_case("subtitle") && strip_bullet(rest).is_none() =>
        {
            rest.trim()
        }
        _ => line,
    }
}

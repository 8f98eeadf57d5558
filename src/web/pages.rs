//! HTML pages served by the web front end.

use crate::deck::Theme;
use crate::slide::{Slide, slides_to_markup};

pub(crate) const INDEX: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/index.html"));
pub(crate) const STYLE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/style.css"));

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn slide_card(slide: &Slide, theme: Theme) -> String {
    let class = match theme {
        Theme::Default => "slide",
        Theme::Dark => "slide dark",
    };
    let mut html = format!(
        r#"<section class="{class}"><h2>{}</h2>"#,
        html_escape(&slide.title)
    );

    if slide.bullets.is_empty() {
        for line in slide.content.lines() {
            html.push_str(&format!("<p>{}</p>", html_escape(line)));
        }
    } else {
        if let Some(subtitle) = slide.subtitle() {
            html.push_str(&format!(
                r#"<p class="subtitle">{}</p>"#,
                html_escape(subtitle)
            ));
        }
        html.push_str("<ul>");
        for bullet in &slide.bullets {
            html.push_str(&format!("<li>{}</li>", html_escape(bullet)));
        }
        html.push_str("</ul>");
    }

    html.push_str("</section>");
    html
}

/// Preview of the session's slides with the edit form and export actions.
pub(crate) fn preview_page(slides: &[Slide], theme: Theme) -> String {
    let mut cards: String = slides.iter().map(|slide| slide_card(slide, theme)).collect();

    if slides.is_empty() {
        cards.push_str(
            r#"<p class="notice">No slides could be read from the model's reply. Write them below or start over.</p>"#,
        );
    }

    let heading = match slides.len() {
        1 => "Preview (1 slide)".to_owned(),
        count => format!("Preview ({count} slides)"),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>deckgen - preview</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <main>
    <h1>{heading}</h1>
    <div class="actions">
      <a class="button" href="/export">Download presentation</a>
      <a href="/slides.json">JSON</a>
      <form method="post" action="/reset"><button type="submit">Start over</button></form>
    </div>
    {cards}
    <h2>Edit</h2>
    <form method="post" action="/edit">
      <textarea class="markup" name="slides_text" rows="20">{markup}</textarea>
      <button type="submit">Update slides</button>
    </form>
  </main>
</body>
</html>
"#,
        heading = heading,
        cards = cards,
        markup = html_escape(&slides_to_markup(slides)),
    )
}

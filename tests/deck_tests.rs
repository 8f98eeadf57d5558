use std::io::{Cursor, Read};

use deckgen::{DeckWriter, Slide, Theme, parse_slides};
use spectral::prelude::*;
use zip::ZipArchive;

fn read_part(deck: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(deck)).expect("Expected a zip archive.");
    let mut part = archive.by_name(name).expect("Expected the part to exist.");
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("Expected UTF-8 XML.");
    xml
}

fn part_names(deck: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(deck)).expect("Expected a zip archive.");
    archive.file_names().map(str::to_owned).collect()
}

fn sample_slides() -> Vec<Slide> {
    vec![
        Slide::new(
            "Why Rust",
            Some("Memory safety"),
            vec!["Ownership".to_owned(), "Borrowing".to_owned()],
        ),
        Slide::new("Next steps", Some("Start small"), Vec::new()),
    ]
}

#[test]
fn writes_one_part_per_slide() {
    let deck = DeckWriter::new(Theme::Default)
        .write(&sample_slides())
        .expect("Expected a deck.");
    let names = part_names(&deck);

    for expected in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "docProps/app.xml",
        "ppt/presentation.xml",
        "ppt/_rels/presentation.xml.rels",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
        "ppt/slides/slide1.xml",
        "ppt/slides/slide2.xml",
        "ppt/slides/_rels/slide2.xml.rels",
    ] {
        assert_that(&names).contains(expected.to_owned());
    }
    assert!(!names.contains(&"ppt/slides/slide3.xml".to_owned()));

    let presentation = read_part(&deck, "ppt/presentation.xml");
    assert_that(&presentation).contains(r#"<p:sldId id="256" r:id="rId3"/>"#);
    assert_that(&presentation).contains(r#"<p:sldId id="257" r:id="rId4"/>"#);

    let rels = read_part(&deck, "ppt/_rels/presentation.xml.rels");
    assert_that(&rels).contains(r#"Id="rId4""#);
    assert_that(&rels).contains(r#"Target="slides/slide2.xml""#);

    let content_types = read_part(&deck, "[Content_Types].xml");
    assert_that(&content_types).contains("/ppt/slides/slide2.xml");
}

#[test]
fn places_subtitle_and_bullets_in_body() {
    let deck = DeckWriter::default()
        .write(&sample_slides())
        .expect("Expected a deck.");
    let slide = read_part(&deck, "ppt/slides/slide1.xml");

    assert_that(&slide).contains("<a:t>Why Rust</a:t>");
    assert_that(&slide).contains(r#"<a:t>Memory safety</a:t>"#);
    assert_that(&slide).contains(r#"<a:pPr lvl="1"/><a:r><a:rPr lang="en-US" dirty="0"/><a:t>Ownership</a:t>"#);
    assert_that(&slide).contains(r#"<p:ph type="title"/>"#);
    assert_that(&slide).contains(r#"<p:ph idx="1"/>"#);

    let second = read_part(&deck, "ppt/slides/slide2.xml");
    assert_that(&second).contains("<a:t>Start small</a:t>");
    assert!(!second.contains(r#"lvl="1""#));
}

#[test]
fn escapes_markup_in_text() {
    let slides = vec![Slide::new(
        "Q&A <live>",
        None,
        vec!["\"quoted\" & 'single'".to_owned()],
    )];
    let deck = DeckWriter::default().write(&slides).expect("Expected a deck.");
    let slide = read_part(&deck, "ppt/slides/slide1.xml");

    assert_that(&slide).contains("Q&amp;A &lt;live&gt;");
    assert!(!slide.contains("<live>"));

    let core = read_part(&deck, "docProps/core.xml");
    assert_that(&core).contains("<dc:title>Q&amp;A &lt;live&gt;</dc:title>");
}

#[test]
fn empty_deck_is_still_a_presentation() {
    let deck = DeckWriter::default().write(&[]).expect("Expected a deck.");
    let names = part_names(&deck);

    assert_that(&names).contains("ppt/presentation.xml".to_owned());
    assert_that(&names.iter().any(|name| name.starts_with("ppt/slides/"))).is_false();
    assert!(!read_part(&deck, "ppt/presentation.xml").contains("sldIdLst"));
    assert_that(&read_part(&deck, "docProps/app.xml")).contains("<Slides>0</Slides>");
}

#[test]
fn dark_theme_swaps_color_mapping() {
    let deck = DeckWriter::new(Theme::Dark)
        .write(&sample_slides())
        .expect("Expected a deck.");

    assert_that(&read_part(&deck, "ppt/slideMasters/slideMaster1.xml"))
        .contains(r#"<p:clrMap bg1="dk1" tx1="lt1""#);
    assert_that(&read_part(&deck, "ppt/theme/theme1.xml")).contains(r#"<a:clrScheme name="dark">"#);
}

#[test]
fn theme_names_parse() {
    assert_that(&"Dark".parse::<Theme>()).is_equal_to(Ok(Theme::Dark));
    assert_that(&"".parse::<Theme>()).is_equal_to(Ok(Theme::Default));
    assert_that(&"neon".parse::<Theme>().is_err()).is_true();
}

#[test]
fn saved_reply_renders_to_a_file() {
    let path = std::env::temp_dir().join(format!("deckgen-{}.pptx", uuid::Uuid::new_v4()));
    let path_str = path.to_str().expect("Expected a UTF-8 temp path.");
    let slides = parse_slides("Slide 1: From a file\n- Rendered offline\n\nSlide 2: Second\n- Also here");

    DeckWriter::new(Theme::Dark)
        .write_to_path(&slides, path_str)
        .expect("Expected the deck to be written.");
    let deck = std::fs::read(&path).expect("Expected the deck file.");
    std::fs::remove_file(&path).expect("Expected the deck file to be removed.");

    assert_that(&read_part(&deck, "ppt/slides/slide1.xml")).contains("From a file");
    assert_that(&read_part(&deck, "ppt/slides/slide2.xml")).contains("Also here");
    assert_that(&read_part(&deck, "ppt/slideMasters/slideMaster1.xml"))
        .contains(r#"<p:clrMap bg1="dk1" tx1="lt1""#);
}

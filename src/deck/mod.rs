//! The deck module writes slides into a `.pptx` presentation package.

mod parts;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use std::fs::OpenOptions;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::FileOptions;

use crate::slide::Slide;

/// Colour theme of the generated deck.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Theme {
    /// Dark text on a white background
    #[default]
    Default,
    /// Light text on a dark background
    Dark,
}

/// The four base colours of a theme's colour scheme.
pub(crate) struct Palette {
    pub(crate) dark1: &'static str,
    pub(crate) light1: &'static str,
    pub(crate) dark2: &'static str,
    pub(crate) light2: &'static str,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
        }
    }

    pub(crate) fn palette(self) -> Palette {
        match self {
            Theme::Default => Palette {
                dark1: "000000",
                light1: "FFFFFF",
                dark2: "1F497D",
                light2: "EEECE1",
            },
            Theme::Dark => Palette {
                dark1: "1B1F2A",
                light1: "F5F5F5",
                dark2: "2E3440",
                light2: "A3BE8C",
            },
        }
    }

    /// The dark theme swaps background and text slots so every placeholder follows.
    pub(crate) fn color_map(self) -> &'static str {
        match self {
            Theme::Default => {
                r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#
            }
            Theme::Dark => {
                r#"<p:clrMap bg1="dk1" tx1="lt1" bg2="dk2" tx2="lt2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#
            }
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "" | "default" | "light" => Ok(Theme::Default),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Invalid theme: {}", input)),
        }
    }
}

/// Writes slides into an in-memory presentation package.
#[derive(Clone, Debug, Default)]
pub struct DeckWriter {
    theme: Theme,
}

impl DeckWriter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Builds a `.pptx` file with one "Title and Content" slide per record.
    ///
    /// An empty slice still yields a valid presentation without slides.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be written
    pub fn write(&self, slides: &[Slide]) -> Result<Vec<u8>> {
        let count = slides.len();
        let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let title = slides.first().map(|slide| slide.title.as_str()).unwrap_or("");

        let mut package = Package::new();
        package.add("[Content_Types].xml", &parts::content_types_xml(count)?)?;
        package.add("_rels/.rels", &parts::root_rels_xml()?)?;
        package.add("docProps/core.xml", &parts::core_props_xml(title, &created))?;
        package.add("docProps/app.xml", &parts::app_props_xml(count))?;
        package.add("ppt/presentation.xml", &parts::presentation_xml(count)?)?;
        package.add(
            "ppt/_rels/presentation.xml.rels",
            &parts::presentation_rels_xml(count)?,
        )?;
        package.add(
            "ppt/slideMasters/slideMaster1.xml",
            &parts::slide_master_xml(self.theme)?,
        )?;
        package.add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::slide_master_rels_xml()?,
        )?;
        package.add(
            "ppt/slideLayouts/slideLayout1.xml",
            &parts::slide_layout_xml()?,
        )?;
        package.add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &parts::slide_layout_rels_xml()?,
        )?;
        package.add("ppt/theme/theme1.xml", &parts::theme_xml(self.theme)?)?;

        for (index, slide) in slides.iter().enumerate() {
            let number = index + 1;
            package.add(
                &format!("ppt/slides/slide{number}.xml"),
                &parts::slide_xml(slide)?,
            )?;
            package.add(
                &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                &parts::slide_rels_xml()?,
            )?;
        }

        let bytes = package.finish()?;
        debug!(
            "Wrote deck with {count} slides ({} bytes, {} theme)",
            bytes.len(),
            self.theme.name()
        );
        Ok(bytes)
    }

    /// Writes the deck to a file, replacing it if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The archive cannot be written
    /// * File operations fail
    pub fn write_to_path(&self, slides: &[Slide], output_path: &str) -> Result<()> {
        let bytes = self.write(slides)?;
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(output_path)
            .context(format!("Failed to open output file: {output_path}"))?;
        file.write_all(&bytes)?;
        info!("Wrote {} slides to {output_path}", slides.len());
        Ok(())
    }
}

struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
}

impl Package {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: FileOptions::default().compression_method(zip::CompressionMethod::Deflated),
        }
    }

    fn add(&mut self, name: &str, xml: &str) -> Result<()> {
        self.zip
            .start_file(name, self.options)
            .context(format!("Failed to start package part {name}"))?;
        self.zip.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        Ok(self.zip.finish()?.into_inner())
    }
}

//! XML parts of a presentation package.
//!
//! The package holds one master, one "Title and Content" layout and one theme, which is
//! the least PowerPoint and LibreOffice accept. Slide geometry is 10" x 7.5" (4:3).

use anyhow::Result;
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

use super::Theme;
use crate::slide::Slide;

pub(crate) const SLIDE_WIDTH: i64 = 9144000;
pub(crate) const SLIDE_HEIGHT: i64 = 6858000;

/// First slide id PowerPoint hands out; ids below 256 are reserved.
const FIRST_SLIDE_ID: usize = 256;
/// Relationships rId1 and rId2 of presentation.xml are the master and the theme.
const FIRST_SLIDE_REL: usize = 3;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Escapes text for element content, dropping characters XML 1.0 cannot carry.
fn xml_text(text: &str) -> String {
    let sanitized: String = text
        .chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect();
    escape(sanitized.as_str()).into_owned()
}

fn relationships(entries: &[(String, String, String)]) -> Result<String> {
    let mut xml = String::with_capacity(256 + entries.len() * 160);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in entries {
        write!(
            xml,
            r#"<Relationship Id="{id}" Type="{kind}" Target="{target}"/>"#
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn rel(id: usize, kind: &str, target: &str) -> (String, String, String) {
    (format!("rId{id}"), format!("{REL_BASE}/{kind}"), target.to_owned())
}

pub(crate) fn content_types_xml(slide_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(2048 + slide_count * 160);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    for number in 1..=slide_count {
        write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{number}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        )?;
    }
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    xml.push_str("</Types>");
    Ok(xml)
}

pub(crate) fn root_rels_xml() -> Result<String> {
    relationships(&[
        rel(1, "officeDocument", "ppt/presentation.xml"),
        (
            "rId2".to_owned(),
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties"
                .to_owned(),
            "docProps/core.xml".to_owned(),
        ),
        rel(3, "extended-properties", "docProps/app.xml"),
    ])
}

pub(crate) fn core_props_xml(title: &str, created: &str) -> String {
    format!(
        concat!(
            r#"{decl}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{title}</dc:title><dc:creator>deckgen</dc:creator>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified>"#,
            "</cp:coreProperties>"
        ),
        decl = XML_DECLARATION,
        title = xml_text(title),
        created = created,
    )
}

pub(crate) fn app_props_xml(slide_count: usize) -> String {
    format!(
        concat!(
            r#"{decl}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
            "<Application>deckgen</Application><Slides>{count}</Slides></Properties>"
        ),
        decl = XML_DECLARATION,
        count = slide_count,
    )
}

pub(crate) fn presentation_xml(slide_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1">"#
    )?;
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for index in 0..slide_count {
            write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + index,
                FIRST_SLIDE_REL + index
            )?;
        }
        xml.push_str("</p:sldIdLst>");
    }

    write!(
        xml,
        r#"<p:sldSz cx="{SLIDE_WIDTH}" cy="{SLIDE_HEIGHT}" type="screen4x3"/>"#
    )?;
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    Ok(xml)
}

pub(crate) fn presentation_rels_xml(slide_count: usize) -> Result<String> {
    let mut entries = vec![
        rel(1, "slideMaster", "slideMasters/slideMaster1.xml"),
        rel(2, "theme", "theme/theme1.xml"),
    ];
    entries.extend(
        (0..slide_count)
            .map(|index| rel(FIRST_SLIDE_REL + index, "slide", &format!("slides/slide{}.xml", index + 1))),
    );
    relationships(&entries)
}

pub(crate) fn slide_master_rels_xml() -> Result<String> {
    relationships(&[
        rel(1, "slideLayout", "../slideLayouts/slideLayout1.xml"),
        rel(2, "theme", "../theme/theme1.xml"),
    ])
}

pub(crate) fn slide_layout_rels_xml() -> Result<String> {
    relationships(&[rel(1, "slideMaster", "../slideMasters/slideMaster1.xml")])
}

pub(crate) fn slide_rels_xml() -> Result<String> {
    relationships(&[rel(1, "slideLayout", "../slideLayouts/slideLayout1.xml")])
}

const GROUP_SHAPE_PROPERTIES: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// Placeholder shape; `geometry` is `(x, y, cx, cy)` on the master and `None` where it is inherited.
fn placeholder(
    xml: &mut String,
    id: u32,
    name: &str,
    placeholder: &str,
    geometry: Option<(i64, i64, i64, i64)>,
    body: &str,
) -> Result<()> {
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{placeholder}</p:nvPr></p:nvSpPr>"#
    )?;
    match geometry {
        Some((x, y, cx, cy)) => write!(
            xml,
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#
        )?,
        None => xml.push_str("<p:spPr/>"),
    }
    write!(xml, "<p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp>")?;
    Ok(())
}

const TITLE_PLACEHOLDER: &str = r#"<p:ph type="title"/>"#;
const BODY_PLACEHOLDER: &str = r#"<p:ph idx="1"/>"#;
const MASTER_BODY_PLACEHOLDER: &str = r#"<p:ph type="body" idx="1"/>"#;
const EMPTY_PARAGRAPH: &str = r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#;

pub(crate) fn slide_master_xml(theme: Theme) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#
    )?;
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#);
    xml.push_str(GROUP_SHAPE_PROPERTIES);
    placeholder(
        &mut xml,
        2,
        "Title Placeholder 1",
        TITLE_PLACEHOLDER,
        Some((457200, 274638, 8229600, 1143000)),
        EMPTY_PARAGRAPH,
    )?;
    placeholder(
        &mut xml,
        3,
        "Text Placeholder 2",
        MASTER_BODY_PLACEHOLDER,
        Some((457200, 1600200, 8229600, 4525963)),
        EMPTY_PARAGRAPH,
    )?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(theme.color_map());
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str(concat!(
        "<p:txStyles>",
        r#"<p:titleStyle><a:lvl1pPr algn="l"><a:defRPr sz="4000" b="1"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mj-lt"/></a:defRPr></a:lvl1pPr></p:titleStyle>"#,
        "<p:bodyStyle>",
        r#"<a:lvl1pPr marL="0" indent="0"><a:spcBef><a:spcPts val="600"/></a:spcBef><a:buNone/>"#,
        r#"<a:defRPr sz="2400" i="1"><a:solidFill><a:schemeClr val="tx2"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr>"#,
        r#"<a:lvl2pPr marL="457200" indent="-342900"><a:spcBef><a:spcPts val="600"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#,
        r#"<a:defRPr sz="2000"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl2pPr>"#,
        "</p:bodyStyle>",
        r#"<p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill></a:defRPr></a:lvl1pPr></p:otherStyle>"#,
        "</p:txStyles>"
    ));
    xml.push_str("</p:sldMaster>");
    Ok(xml)
}

pub(crate) fn slide_layout_xml() -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="obj" preserve="1">"#
    )?;
    xml.push_str(r#"<p:cSld name="Title and Content"><p:spTree>"#);
    xml.push_str(GROUP_SHAPE_PROPERTIES);
    placeholder(&mut xml, 2, "Title 1", TITLE_PLACEHOLDER, None, EMPTY_PARAGRAPH)?;
    placeholder(&mut xml, 3, "Content Placeholder 2", BODY_PLACEHOLDER, None, EMPTY_PARAGRAPH)?;
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    Ok(xml)
}

fn paragraph(xml: &mut String, level: u8, text: &str) -> Result<()> {
    xml.push_str("<a:p>");
    if level > 0 {
        write!(xml, r#"<a:pPr lvl="{level}"/>"#)?;
    }
    write!(
        xml,
        r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
        xml_text(text)
    )?;
    Ok(())
}

/// Body paragraphs: the subtitle at level 0 and bullets at level 1 beneath it.
/// Bullets without a subtitle stay at level 1 so they keep their bullet character.
fn slide_body(slide: &Slide) -> Result<String> {
    let mut body = String::with_capacity(256 + slide.content.len() * 2);

    if slide.bullets.is_empty() {
        for line in slide.content.lines() {
            paragraph(&mut body, 0, line)?;
        }
    } else {
        if let Some(subtitle) = slide.subtitle() {
            paragraph(&mut body, 0, subtitle)?;
        }
        for bullet in &slide.bullets {
            paragraph(&mut body, 1, bullet)?;
        }
    }

    if body.is_empty() {
        body.push_str(EMPTY_PARAGRAPH);
    }
    Ok(body)
}

pub(crate) fn slide_xml(slide: &Slide) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#
    )?;
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(GROUP_SHAPE_PROPERTIES);

    let mut title = String::new();
    paragraph(&mut title, 0, &slide.title)?;
    placeholder(&mut xml, 2, "Title 1", TITLE_PLACEHOLDER, None, &title)?;
    placeholder(
        &mut xml,
        3,
        "Content Placeholder 2",
        BODY_PLACEHOLDER,
        None,
        &slide_body(slide)?,
    )?;

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    Ok(xml)
}

pub(crate) fn theme_xml(theme: Theme) -> Result<String> {
    let palette = theme.palette();
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<a:theme xmlns:a="{NS_A}" name="{}"><a:themeElements>"#,
        theme.name()
    )?;
    write!(xml, r#"<a:clrScheme name="{}">"#, theme.name())?;
    for (slot, color) in [
        ("dk1", palette.dark1),
        ("lt1", palette.light1),
        ("dk2", palette.dark2),
        ("lt2", palette.light2),
        ("accent1", "4F81BD"),
        ("accent2", "C0504D"),
        ("accent3", "9BBB59"),
        ("accent4", "8064A2"),
        ("accent5", "4BACC6"),
        ("accent6", "F79646"),
        ("hlink", "0000FF"),
        ("folHlink", "800080"),
    ] {
        write!(xml, r#"<a:{slot}><a:srgbClr val="{color}"/></a:{slot}>"#)?;
    }
    xml.push_str("</a:clrScheme>");
    xml.push_str(concat!(
        r#"<a:fontScheme name="Office">"#,
        r#"<a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
        r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
        "</a:fontScheme>",
        r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        "</a:fillStyleLst><a:lnStyleLst>",
        r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        r#"<a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        r#"<a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
        "</a:lnStyleLst><a:effectStyleLst>",
        "<a:effectStyle><a:effectLst/></a:effectStyle>",
        "<a:effectStyle><a:effectLst/></a:effectStyle>",
        "<a:effectStyle><a:effectLst/></a:effectStyle>",
        "</a:effectStyleLst><a:bgFillStyleLst>",
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
        "</a:bgFillStyleLst></a:fmtScheme>",
        "</a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"
    ));
    Ok(xml)
}

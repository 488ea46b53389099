//! DOCX reader.
//!
//! Only the parts needed for template mining are read: the main document
//! body, the style sheet, and header/footer parts. The paragraph stream is
//! the direct `w:p` children of `w:body` (or `w:hdr`/`w:ftr`); paragraphs
//! nested in tables, content controls and text boxes are not part of it.
//! Paragraph text is the concatenation of `w:t` in the paragraph's own runs
//! (including hyperlink runs), with `w:tab` as `\t` and `w:br`/`w:cr` as
//! `\n`.
use std::collections::HashMap;
use std::io::{Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::config::IngestConfig;
use crate::error::ParseError;
use crate::types::ParagraphRecord;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const HEADER_PREFIX: &str = "word/header";
const FOOTER_PREFIX: &str = "word/footer";

const BODY_CONTAINERS: &[&[u8]] = &[b"body"];
const HEADER_FOOTER_CONTAINERS: &[&[u8]] = &[b"hdr", b"ftr"];

/// Twentieths of a point.
const TWIPS_PER_POINT: f64 = 20.0;

/// Outline level 9 marks body text.
const BODY_TEXT_OUTLINE: u8 = 9;

pub(crate) struct DocxContent {
    pub paragraphs: Vec<ParagraphRecord>,
    pub headers: Vec<String>,
    pub footers: Vec<String>,
}

pub(crate) fn read_docx<R: Read + Seek>(
    reader: R,
    cfg: &IngestConfig,
) -> Result<DocxContent, ParseError> {
    let mut archive = ZipArchive::new(reader)?;

    let document = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or_else(|| ParseError::MissingPart(DOCUMENT_PART.to_string()))?;
    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => StyleSheet::parse(&xml)?,
        None => StyleSheet::default(),
    };

    let paragraphs = parse_paragraphs(&document, DOCUMENT_PART, BODY_CONTAINERS, &styles, cfg)?;

    let (headers, footers) = if cfg.include_headers_footers {
        (
            read_blocks(&mut archive, HEADER_PREFIX, &styles, cfg)?,
            read_blocks(&mut archive, FOOTER_PREFIX, &styles, cfg)?,
        )
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(DocxContent {
        paragraphs,
        headers,
        footers,
    })
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ParseError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    let mut xml = String::from_utf8(bytes).map_err(|err| ParseError::xml(name, err))?;
    if xml.starts_with('\u{feff}') {
        xml.drain(..'\u{feff}'.len_utf8());
    }
    Ok(Some(xml))
}

/// Reads every part named `<prefix>*.xml` in name order and returns one
/// block per part: its non-blank paragraph texts joined by `\n`.
fn read_blocks<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    prefix: &str,
    styles: &StyleSheet,
    cfg: &IngestConfig,
) -> Result<Vec<String>, ParseError> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with(prefix) && name.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    names.sort();

    let mut blocks = Vec::new();
    for name in names {
        let Some(xml) = read_part(archive, &name)? else {
            continue;
        };
        let paragraphs = parse_paragraphs(&xml, &name, HEADER_FOOTER_CONTAINERS, styles, cfg)?;
        let block = paragraphs
            .iter()
            .filter(|p| !p.is_blank())
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if !block.is_empty() {
            blocks.push(block);
        }
    }
    Ok(blocks)
}

/// Style id to display name mapping from `word/styles.xml`.
#[derive(Debug, Default)]
pub(crate) struct StyleSheet {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleSheet {
    pub(crate) fn parse(xml: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut sheet = StyleSheet::default();
        // (style id, is default paragraph style)
        let mut current: Option<(String, bool)> = None;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|err| ParseError::xml(STYLES_PART, err))?;
            match event {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"style" => {
                        let id = attr(&e, b"styleId", STYLES_PART)?;
                        let kind = attr(&e, b"type", STYLES_PART)?;
                        let is_default = attr(&e, b"default", STYLES_PART)?
                            .is_some_and(|v| v == "1" || v == "true");
                        current = id.map(|id| {
                            (id, is_default && kind.as_deref() == Some("paragraph"))
                        });
                    }
                    b"name" => {
                        if let (Some((id, is_default)), Some(raw)) =
                            (current.as_ref(), attr(&e, b"val", STYLES_PART)?)
                        {
                            let display = display_style_name(&raw);
                            if *is_default {
                                sheet.default_paragraph = Some(display.clone());
                            }
                            sheet.names.insert(id.clone(), display);
                        }
                    }
                    _ => {}
                },
                Event::End(e) if e.local_name().as_ref() == b"style" => current = None,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(sheet)
    }

    /// Display name for a paragraph's `w:pStyle` id. Ids missing from the
    /// style sheet are used verbatim.
    pub(crate) fn resolve(&self, style_id: Option<&str>, cfg: &IngestConfig) -> String {
        match style_id {
            Some(id) => self
                .names
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.to_string()),
            None => self
                .default_paragraph
                .clone()
                .unwrap_or_else(|| cfg.default_style.clone()),
        }
    }
}

/// Built-in styles are stored lower-case (`heading 1`); Word shows them
/// title-cased.
fn display_style_name(raw: &str) -> String {
    if raw.chars().any(char::is_uppercase) {
        return raw.to_string();
    }
    raw.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Heading level encoded in a style name such as `Heading 2` or
/// `Überschrift 2`.
pub fn heading_level_from_style(style_name: &str) -> Option<u8> {
    let rest = style_name
        .strip_prefix("Heading")
        .or_else(|| style_name.strip_prefix("Überschrift"))?;
    rest.trim().parse::<u8>().ok().filter(|level| *level > 0)
}

#[derive(Debug, Default)]
struct ParagraphBuilder {
    depth: usize,
    text: String,
    style_id: Option<String>,
    outline_lvl: Option<u8>,
    is_list: bool,
    list_level: Option<u8>,
    spacing_before: Option<f64>,
    spacing_after: Option<f64>,
    left_indent: Option<f64>,
    alignment: Option<String>,
}

impl ParagraphBuilder {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Element path below this paragraph, excluding the paragraph itself.
    fn inner<'a>(&self, stack: &'a [Vec<u8>]) -> &'a [Vec<u8>] {
        stack.get(self.depth + 1..).unwrap_or(&[])
    }

    fn open(
        &mut self,
        e: &BytesStart<'_>,
        stack: &[Vec<u8>],
        part: &str,
    ) -> Result<(), ParseError> {
        let inner = self.inner(stack);
        let name = e.local_name();
        if path_is(inner, &[b"pPr"]) {
            match name.as_ref() {
                b"pStyle" => self.style_id = attr(e, b"val", part)?,
                b"outlineLvl" => {
                    self.outline_lvl = attr(e, b"val", part)?.and_then(|v| v.parse().ok());
                }
                b"numPr" => self.is_list = true,
                b"spacing" => {
                    self.spacing_before = attr(e, b"before", part)?.and_then(|v| twips(&v));
                    self.spacing_after = attr(e, b"after", part)?.and_then(|v| twips(&v));
                }
                b"ind" => {
                    let left = match attr(e, b"left", part)? {
                        Some(v) => Some(v),
                        None => attr(e, b"start", part)?,
                    };
                    self.left_indent = left.and_then(|v| twips(&v));
                }
                b"jc" => self.alignment = attr(e, b"val", part)?,
                _ => {}
            }
        } else if path_is(inner, &[b"pPr", b"numPr"]) && name.as_ref() == b"ilvl" {
            self.list_level = attr(e, b"val", part)?.and_then(|v| v.parse().ok());
        } else if is_run_path(inner) {
            match name.as_ref() {
                b"tab" => self.text.push('\t'),
                b"br" | b"cr" => self.text.push('\n'),
                _ => {}
            }
        }
        Ok(())
    }

    fn accepts_text(&self, stack: &[Vec<u8>]) -> bool {
        let inner = self.inner(stack);
        match inner.split_last() {
            Some((last, parents)) => last.as_slice() == b"t" && is_run_path(parents),
            None => false,
        }
    }

    fn finish(self, styles: &StyleSheet, cfg: &IngestConfig) -> ParagraphRecord {
        let style_name = styles.resolve(self.style_id.as_deref(), cfg);
        let outline_level = heading_level_from_style(&style_name).or_else(|| {
            self.outline_lvl
                .filter(|lvl| *lvl < BODY_TEXT_OUTLINE)
                .map(|lvl| lvl + 1)
        });
        let text = if cfg.strip_control_chars {
            self.text
                .chars()
                .filter(|c| !c.is_control() || *c == '\t' || *c == '\n')
                .collect()
        } else {
            self.text
        };
        ParagraphRecord {
            text,
            style_name,
            outline_level,
            is_list: self.is_list,
            list_level: self.list_level,
            spacing_before: self.spacing_before,
            spacing_after: self.spacing_after,
            left_indent: self.left_indent,
            alignment: self.alignment,
        }
    }
}

fn parse_paragraphs(
    xml: &str,
    part: &str,
    containers: &[&[u8]],
    styles: &StyleSheet,
    cfg: &IngestConfig,
) -> Result<Vec<ParagraphRecord>, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<ParagraphBuilder> = None;
    let mut paragraphs = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| ParseError::xml(part, err))?;
        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                match current.as_mut() {
                    Some(para) => para.open(&e, &stack, part)?,
                    None if name == b"p" && parent_is_container(&stack, containers) => {
                        current = Some(ParagraphBuilder::new(stack.len()));
                    }
                    None => {}
                }
                stack.push(name);
            }
            Event::Empty(e) => match current.as_mut() {
                Some(para) => para.open(&e, &stack, part)?,
                None if e.local_name().as_ref() == b"p"
                    && parent_is_container(&stack, containers) =>
                {
                    paragraphs.push(ParagraphBuilder::new(stack.len()).finish(styles, cfg));
                }
                None => {}
            },
            Event::Text(e) => {
                if let Some(para) = current.as_mut() {
                    if para.accepts_text(&stack) {
                        let text = e.unescape().map_err(|err| ParseError::xml(part, err))?;
                        para.text.push_str(&text);
                    }
                }
            }
            Event::End(_) => {
                stack.pop();
                if current.as_ref().is_some_and(|para| para.depth == stack.len()) {
                    if let Some(para) = current.take() {
                        paragraphs.push(para.finish(styles, cfg));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn parent_is_container(stack: &[Vec<u8>], containers: &[&[u8]]) -> bool {
    stack
        .last()
        .is_some_and(|parent| containers.contains(&parent.as_slice()))
}

fn path_is(path: &[Vec<u8>], expected: &[&[u8]]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a.as_slice() == *b)
}

fn is_run_path(path: &[Vec<u8>]) -> bool {
    path_is(path, &[b"r"]) || path_is(path, &[b"hyperlink", b"r"])
}

fn twips(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .map(|v| v as f64 / TWIPS_PER_POINT)
}

fn attr(e: &BytesStart<'_>, key: &[u8], part: &str) -> Result<Option<String>, ParseError> {
    for attribute in e.attributes() {
        let attribute = attribute.map_err(|err| ParseError::xml(part, err))?;
        if attribute.key.local_name().as_ref() == key {
            let value = attribute
                .unescape_value()
                .map_err(|err| ParseError::xml(part, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

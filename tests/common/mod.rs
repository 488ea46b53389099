//! DOCX corpus builder shared by the integration tests.
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

/// One body paragraph of a synthetic document.
#[derive(Debug, Clone)]
pub struct Para {
    pub style_id: &'static str,
    pub text: String,
    pub spacing_after_twips: Option<u32>,
}

pub fn heading(text: &str) -> Para {
    Para {
        style_id: "Heading1",
        text: text.to_string(),
        spacing_after_twips: Some(360),
    }
}

pub fn body(text: &str) -> Para {
    Para {
        style_id: "Normal",
        text: text.to_string(),
        spacing_after_twips: Some(160),
    }
}

pub fn bullet(text: &str) -> Para {
    Para {
        style_id: "ListBullet",
        text: text.to_string(),
        spacing_after_twips: None,
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn paragraph(para: &Para) -> String {
    let spacing = para
        .spacing_after_twips
        .map(|after| format!(r#"<w:spacing w:after="{after}"/>"#))
        .unwrap_or_default();
    let numbering = if para.style_id == "ListBullet" {
        r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr>"#
    } else {
        ""
    };
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/>{numbering}{spacing}</w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        para.style_id,
        escape(&para.text)
    )
}

fn part(root: &str, inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:{root} {W}>{inner}</w:{root}>"#
    )
}

fn styles() -> String {
    format!(
        r#"<w:styles {W}>
            <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
            <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
            <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
            <w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/></w:style>
        </w:styles>"#
    )
}

/// Write a DOCX archive with the given body, header and footer.
pub fn write_docx(path: &Path, paragraphs: &[Para], header: Option<&str>, footer: Option<&str>) {
    let body: String = paragraphs.iter().map(paragraph).collect();
    let mut parts = vec![
        ("[Content_Types].xml", String::from("<Types/>")),
        ("word/document.xml", part("document", &format!("<w:body>{body}</w:body>"))),
        ("word/styles.xml", styles()),
    ];
    if let Some(text) = header {
        parts.push(("word/header1.xml", part("hdr", &paragraph(&body_line(text)))));
    }
    if let Some(text) = footer {
        parts.push(("word/footer1.xml", part("ftr", &paragraph(&body_line(text)))));
    }

    let file = File::create(path).expect("create docx");
    let mut zip = ZipWriter::new(file);
    for (name, content) in parts {
        zip.start_file(name, SimpleFileOptions::default())
            .expect("start part");
        zip.write_all(content.as_bytes()).expect("write part");
    }
    zip.finish().expect("finish docx");
}

fn body_line(text: &str) -> Para {
    Para {
        style_id: "Normal",
        text: text.to_string(),
        spacing_after_twips: None,
    }
}

/// Write a file that is not a valid DOCX archive.
pub fn write_corrupt(path: &Path) {
    std::fs::write(path, b"this is not a zip archive").expect("write corrupt file");
}

const PATIENT_NOTES: [&str; 6] = [
    "Die Probandin klagt seit 2019 über Rückenschmerzen.",
    "Der Proband berichtet über Schlafstörungen nach einem Unfall.",
    "Seit dem Frühjahr bestehen wiederkehrende Kopfschmerzen.",
    "Keine relevanten Vorerkrankungen bekannt.",
    "Zustand nach Bandscheibenvorfall im Lendenwirbelbereich.",
    "Der Untersuchte wirkt erschöpft und niedergeschlagen.",
];

/// A small report family: shared headings and closing line, per-case
/// findings, one running header and footer.
pub fn report_corpus(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("gutachten_{i:02}.docx"));
            let note = PATIENT_NOTES[i % PATIENT_NOTES.len()];
            let finding = format!("Befund Nummer {} mit individueller Ausprägung.", i + 1);
            write_docx(
                &path,
                &[
                    heading("ANAMNESE"),
                    body(note),
                    heading("BEFUND"),
                    body(&finding),
                    bullet("Neurologisch unauffällig"),
                    heading("BEURTEILUNG"),
                    body("Die Beurteilung erfolgt nach bestem Wissen und Gewissen."),
                ],
                Some("Praxis Dr. Beispiel"),
                Some("Vertraulich"),
            );
            path
        })
        .collect()
}

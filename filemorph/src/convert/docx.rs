//! DOCX paragraph extraction and plain-text / HTML rendering.
//!
//! Only body-level paragraphs are read, in document order. A paragraph's
//! text is the concatenation of its `w:t` runs, with `w:tab` as a tab and
//! `w:br` / `w:cr` as a line break. Only runs that are direct children of
//! the paragraph or of a `w:hyperlink` in it count. Paragraphs nested in
//! tables, text boxes or other containers are not part of the paragraph
//! list, and neither is their text.

use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{FileMorphError, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// Read the body paragraphs of a DOCX file.
///
/// # Errors
///
/// Returns an error if the file is not a ZIP package, has no main document
/// part, or the part is not well-formed XML.
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| FileMorphError::FileNotAccessible {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| FileMorphError::invalid_docx(path.to_path_buf(), e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| {
            FileMorphError::invalid_docx(path.to_path_buf(), format!("{DOCUMENT_PART}: {e}"))
        })?
        .read_to_string(&mut xml)
        .map_err(|e| FileMorphError::invalid_docx(path.to_path_buf(), e.to_string()))?;

    paragraphs_from_xml(&xml)
        .map_err(|e| FileMorphError::invalid_docx(path.to_path_buf(), e.to_string()))
}

/// Extract body paragraphs from the XML of a `word/document.xml` part.
pub fn paragraphs_from_xml(xml: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    // Element names from the root down to the current element.
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();

                if name == b"p" && current.is_none() && parent_is_body(&stack) {
                    current = Some(String::new());
                } else if name == b"t" && current.is_some() && in_body_run(&stack) {
                    in_text = true;
                }

                stack.push(name);
            }
            Event::Empty(e) => {
                let name = e.local_name();

                match (name.as_ref(), current.as_mut()) {
                    (b"p", None) if parent_is_body(&stack) => paragraphs.push(String::new()),
                    (b"tab", Some(text)) if in_body_run(&stack) => text.push('\t'),
                    (b"br" | b"cr", Some(text)) if in_body_run(&stack) => text.push('\n'),
                    _ => {}
                }
            }
            Event::Text(t) if in_text => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(t) if in_text => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::End(e) => {
                stack.pop();

                match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" if parent_is_body(&stack) => {
                        if let Some(text) = current.take() {
                            paragraphs.push(text);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parent_is_body(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|name| name == b"body")
}

/// Whether the innermost open element is a run of a body paragraph,
/// directly or through a hyperlink.
fn in_body_run(stack: &[Vec<u8>]) -> bool {
    let Some((run, rest)) = stack.split_last() else {
        return false;
    };
    let rest = match rest.split_last() {
        Some((link, outer)) if link == b"hyperlink" => outer,
        _ => rest,
    };

    run == b"r" && matches!(rest, [.., body, p] if body == b"body" && p == b"p")
}

/// Render paragraphs as plain text: each paragraph followed by a newline.
pub fn render_text(paragraphs: &[String]) -> String {
    let mut out = String::new();
    for paragraph in paragraphs {
        out.push_str(paragraph);
        out.push('\n');
    }
    out
}

/// Render paragraphs as a minimal HTML document, one `<p>` per paragraph.
pub fn render_html(paragraphs: &[String]) -> String {
    let mut out = String::from("<html><body>\n");
    for paragraph in paragraphs {
        out.push_str("<p>");
        out.push_str(&escape_html(paragraph));
        out.push_str("</p>\n");
    }
    out.push_str("</body></html>");
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

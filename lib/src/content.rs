//! Reading page templates and post sources into [`ContentRecord`]s.
//!
//! A post source looks like this:
//!
//! ```text
//! <!--( { "date": "2014-03-14" } )-->
//! # Lorem Ipsum
//!
//! Body text in *Markdown*.
//! ```
//!
//! The first [`POST_SENTINEL_LEN`] bytes are skipped. Everything up to the
//! first [`POST_HEADER_END`] is the header, a JSON object. The rest, trimmed,
//! is the body: its first line is the title, minus a leading marker such as
//! `#`; the remaining lines are Markdown.

use std::path::Path;
use std::sync::Arc;

use memchr::{memchr, memmem};

use crate::error::{Chainable, Result};
use crate::markdown::{front_matter, Markdown};
use crate::value::{Dict, Format, Json, Source, Value};

/// Bytes at the start of a post source that precede the header.
pub const POST_SENTINEL_LEN: usize = 5;

/// Terminates a post header.
pub const POST_HEADER_END: &str = ")-->";

/// A parsed source: named fields plus the raw body text.
///
/// For page templates `fields` is the front matter and `body` the template
/// text after it. For posts `fields` is the header plus `title` and
/// `content` (rendered HTML), and `body` the Markdown it was rendered from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentRecord {
    pub fields: Dict,
    pub body: Arc<str>,
}

impl ContentRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title")
    }

    /// The layout named in front matter, if any.
    pub fn layout(&self) -> Option<&str> {
        self.field("layout")
    }
}

/// Reads a template, splitting off its front matter. A template without
/// front matter has no fields.
pub fn load_page_template(path: &Path) -> Result<ContentRecord> {
    let input = path.read()?;
    let (fields, body) = front_matter(&input).chain_with(|| error! {
        "failed to parse template front matter",
        "template" => path.display(),
    })?;

    Ok(ContentRecord { fields, body: body.into() })
}

/// Reads and parses the post source at `path`.
pub fn load_post(path: &Path) -> Result<ContentRecord> {
    let input = path.read()?;
    parse_post(&input).chain_with(|| error! {
        "failed to parse post",
        "post source" => path.display(),
    })
}

pub fn parse_post(input: &str) -> Result<ContentRecord> {
    let rest = input.get(POST_SENTINEL_LEN..)
        .ok_or_else(|| error!(ParseFailure: "post source is shorter than its opening sentinel"))?;

    let end = memmem::find(rest.as_bytes(), POST_HEADER_END.as_bytes())
        .ok_or_else(|| error! {
            ParseFailure: "post header is not terminated",
            "expected terminator" => POST_HEADER_END,
        })?;

    let header = rest[..end].trim();
    let body = rest[end + POST_HEADER_END.len()..].trim();

    let mut fields = Json::from_str::<Dict>(header)
        .chain(error!(ParseFailure: "post header is not a JSON object"))?;

    let (title, markdown) = match memchr(b'\n', body.as_bytes()) {
        Some(i) => (&body[..i], body[i + 1..].trim()),
        None => (body, ""),
    };

    let content = Markdown::from(markdown).run()?;
    fields.insert("title".into(), strip_title_marker(title).into());
    fields.insert("content".into(), content.into());
    Ok(ContentRecord { fields, body: markdown.into() })
}

fn strip_title_marker(line: &str) -> &str {
    let mut chars = line.chars();
    match chars.next() {
        Some(c) if c.is_ascii_punctuation() => chars.as_str().trim(),
        _ => line.trim(),
    }
}

//! Classifying requested paths and computing canonical post URLs.

mod validate;
mod post;

pub use validate::is_path_char;
pub use post::*;

use std::borrow::Cow;
use std::fmt;

use crate::config::Config;
use crate::error::{Chainable, Result};

/// What a request asks for, decided by its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A compiled stylesheet.
    Asset,
    /// A static page or a post.
    Page,
}

/// Strips the query and fragment from `raw` and percent-decodes the rest.
/// Escapes that do not decode to UTF-8 are a `BadRequest`.
pub fn decode(raw: &str) -> Result<Cow<'_, str>> {
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    urlencoding::decode(path).chain_with(|| error! {
        BadRequest: "request path is not valid percent-encoded UTF-8",
        "path" => raw.escape_debug(),
    })
}

/// A validated request path: absolute, without query or fragment, with no
/// empty, `.` or `..` segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPath<'a>(&'a str);

impl<'a> RequestPath<'a> {
    pub fn parse(raw: &'a str) -> Result<Self> {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let Some(relative) = path.strip_prefix('/') else {
            return err!(BadRequest: "request path must be absolute", "path" => raw);
        };

        if let Some(c) = path.bytes().find(|c| !is_path_char(c)) {
            return err! {
                BadRequest: "request path contains an invalid character",
                "path" => raw.escape_debug(),
                "character" => (c as char).escape_debug(),
            };
        }

        if relative.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
            return err!(BadRequest: "request path has an empty or relative segment", "path" => raw);
        }

        Ok(RequestPath(path))
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// The path without its leading `/`.
    pub fn relative(&self) -> &'a str {
        &self.0[1..]
    }

    pub fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.relative().split('/')
    }

    pub fn file_name(&self) -> &'a str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    pub fn extension(&self) -> Option<&'a str> {
        self.file_name().rsplit_once('.').map(|(_, ext)| ext)
    }

    /// The relative path with its extension replaced by `ext`.
    pub fn relative_with_extension(&self, ext: &str) -> String {
        let relative = self.relative();
        let stem = match self.extension() {
            Some(old) => &relative[..relative.len() - old.len() - 1],
            None => relative,
        };

        format!("{stem}.{ext}")
    }

    /// Names starting with `_` are never served as static pages.
    pub fn is_reserved(&self) -> bool {
        self.file_name().starts_with('_')
    }

    /// Asset or page by case-insensitive extension; `None` for neither.
    pub fn kind(&self, config: &Config) -> Option<Kind> {
        let ext = self.extension()?;
        if config.is_asset_extension(ext) {
            Some(Kind::Asset)
        } else if config.is_page_extension(ext) {
            Some(Kind::Page)
        } else {
            None
        }
    }
}

impl fmt::Display for RequestPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Css,
    Html,
}

impl MediaType {
    pub fn content_type(self) -> &'static str {
        match self {
            MediaType::Css => "text/css; charset=utf-8",
            MediaType::Html => "text/html; charset=utf-8",
        }
    }
}

/// Rendered output and the cache path it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub body: Arc<str>,
    pub media_type: MediaType,
}

impl Artifact {
    pub fn new<B: Into<Arc<str>>>(path: PathBuf, body: B, media_type: MediaType) -> Self {
        Artifact { path, body: body.into(), media_type }
    }
}

/// The single result of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The request named a post through a non-canonical URL.
    Redirect { location: String, permanent: bool },
    Rendered(Artifact),
    Error { status: Status, message: String },
}

impl Outcome {
    pub fn redirect<L: Into<String>>(location: L) -> Self {
        Outcome::Redirect { location: location.into(), permanent: true }
    }

    pub fn error(status: Status) -> Self {
        Outcome::Error { status, message: status.reason().into() }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Outcome::Redirect { permanent: true, .. } => 301,
            Outcome::Redirect { permanent: false, .. } => 302,
            Outcome::Rendered(_) => 200,
            Outcome::Error { status, .. } => status.code(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Outcome::Redirect { permanent: true, .. } => "Moved Permanently",
            Outcome::Redirect { permanent: false, .. } => "Found",
            Outcome::Rendered(_) => "OK",
            Outcome::Error { message, .. } => message,
        }
    }
}

use std::io::{self, Write};

use snug::Outcome;

/// Writes `outcome` as a CGI response: a `Status:` line, headers, a blank
/// line, then the body. Redirects have no body.
pub fn write<W: Write>(mut out: W, outcome: &Outcome, powered_by: &str) -> io::Result<()> {
    write!(out, "Status: {} {}\r\n", outcome.status_code(), outcome.reason())?;
    write!(out, "X-Powered-By: {powered_by}\r\n")?;

    let body = match outcome {
        Outcome::Redirect { location, .. } => {
            write!(out, "Location: {location}\r\n")?;
            None
        }
        Outcome::Rendered(artifact) => {
            write!(out, "Content-Type: {}\r\n", artifact.media_type.content_type())?;
            Some(artifact.body.to_string())
        }
        Outcome::Error { .. } => {
            write!(out, "Content-Type: text/plain; charset=utf-8\r\n")?;
            Some(format!("{} {}\n", outcome.status_code(), outcome.reason()))
        }
    };

    if let Some(body) = &body {
        write!(out, "Content-Length: {}\r\n", body.len())?;
    }

    write!(out, "\r\n")?;
    if let Some(body) = body {
        out.write_all(body.as_bytes())?;
    }

    out.flush()
}

use crate::error::{Chainable, Result};
use crate::value::{Dict, Format, Toml};

const MARK: &str = "+++";

/// Splits a `+++`-delimited TOML block off the top of `input`.
///
/// Returns the decoded fields and the remaining content. Delimiter lines end
/// in `\n` or `\r\n`, as the opening line does. Input without a complete
/// block is all content and yields no fields; a block that is not valid TOML
/// is a parse failure.
pub fn front_matter(input: &str) -> Result<(Dict, &str)> {
    let Some(after_mark) = input.strip_prefix(MARK) else {
        return Ok((Dict::new(), input));
    };

    let newline = if after_mark.starts_with("\r\n") { "\r\n" } else { "\n" };
    let Some(rest) = after_mark.strip_prefix(newline) else {
        return Ok((Dict::new(), input));
    };

    let open = format!("{MARK}{newline}");
    let close = format!("{newline}{MARK}{newline}");
    let close_eof = format!("{newline}{MARK}");

    let (block, content) = if let Some(content) = rest.strip_prefix(&*open) {
        ("", content)
    } else if rest == MARK {
        ("", "")
    } else if let Some((block, content)) = rest.split_once(&*close) {
        (block, content)
    } else if let Some(block) = rest.strip_suffix(&*close_eof) {
        (block, "")
    } else {
        return Ok((Dict::new(), input));
    };

    let fields = Toml::from_str::<Dict>(block)
        .chain(error!(ParseFailure: "front matter is not valid TOML"))?;

    Ok((fields, content))
}

use pulldown_cmark::{html, Options, Parser};

use crate::error::Result;
use crate::value::Source;

/// Converts Markdown from a [`Source`] to HTML.
#[derive(Debug, Clone)]
pub struct Markdown<I> {
    input: I,
    options: Options,
}

impl<I: Source> Markdown<I> {
    /// All extensions except smart punctuation and metadata blocks: a
    /// leading `---` or `+++` block is content here, not front matter.
    pub fn from(input: I) -> Self {
        let excluded = Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
            | Options::ENABLE_PLUSES_DELIMITED_METADATA_BLOCKS;

        Self { input, options: Options::all().difference(excluded) }
    }

    pub fn run(self) -> Result<String> {
        let input = self.input.read()?;
        let parser = Parser::new_ext(&input, self.options);

        let mut html_output = String::with_capacity(input.len() + input.len() / 2);
        html::push_html(&mut html_output, parser);
        Ok(html_output)
    }
}

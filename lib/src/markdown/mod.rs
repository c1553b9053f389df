mod markdown;
mod frontmatter;

pub use markdown::*;
pub use frontmatter::*;

#![doc = svgbobdoc::transform!(
//! A request-driven static site generator.
//!
//! # Overview
//!
//! Snug renders a site lazily: nothing is built ahead of time. A web server
//! serves whatever already exists under the document root and hands every
//! miss to Snug, which renders the requested file, writes it to the exact
//! path that was requested, and returns it. The next request for the same
//! path never reaches Snug.
//!
//! A request is resolved like so:
//!
//! ```svgbob
//!              +--------------+
//!              | request path |
//!              +------+-------+
//!                     |
//!          .----------+-----------.
//!          | asset ext?           | page ext?            otherwise
//!          v                      v                          |
//!    +-----------+        +---------------+                  v
//!    | stylesheet|        | view exists?  |               "400"
//!    +-----+-----+        +---+-------+---+
//!          |               yes|       |no
//!          |                  v       v
//!          |         +----------+  +------+   non-canonical
//!          |         |  static  |  | post +------------------> "301"
//!          |         |   page   |  +--+---+
//!          |         +----+-----+     |
//!          |              |           |
//!          |              v           v
//!          |         +---------------------+
//!          |         |  body, then layout  |
//!          |         +----------+----------+
//!          |                    |
//!          v                    v
//!        +------------------------+
//!        | cache artifact at path |
//!        +------------------------+
//! ```
//!
//! The site lives under one document root (see [`Config`]):
//!
//!   * `_views/` holds page templates, layouts (`_layout.jinja`,
//!     `_layout_<name>.jinja`) and the post template (`_post.jinja`).
//!     Templates may open with `+++`-delimited TOML front matter naming a
//!     `title` and a `layout`.
//!
//!   * `_posts/` holds one JSON descriptor per post, `<id>.json`, mapping
//!     language codes to post sources, plus the sources themselves: a JSON
//!     header between `<!--(` and `)-->`, a title line, and Markdown.
//!
//!   * `_assets/` holds stylesheet sources, compiled to CSS on request.
//!
//! [`Snug::handle`] resolves one path to exactly one [`Outcome`].
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod value;
pub mod config;
pub mod meta;
pub mod markdown;
pub mod content;
pub mod layout;
pub mod templating;
pub mod url;
pub mod outcome;
pub mod cache;
pub mod dispatch;

pub use config::Config;
pub use dispatch::Snug;
pub use error::{Error, Result, Status};
pub use outcome::{Artifact, MediaType, Outcome};

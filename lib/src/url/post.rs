use crate::error::Result;
use crate::url::RequestPath;

/// Extension appended to canonical post URLs.
pub const POST_URL_EXTENSION: &str = "html";

/// Trailing characters of a stored fragment that encode its source extension.
const STORED_SUFFIX_LEN: usize = 2;

/// A request path of the shape `/<lang>/<id>-<slug>.<ext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostPath<'a> {
    pub lang: &'a str,
    pub name: &'a str,
    /// The decimal identifier before the first `-` of `name`.
    pub id: &'a str,
}

impl<'a> PostPath<'a> {
    /// Splits `path` into language, file name and id. Paths not shaped like
    /// `/<lang>/<id>-<slug>` are not posts (`NotFound`); a non-numeric id
    /// before the first `-` is `BadRequest`.
    pub fn parse(path: RequestPath<'a>) -> Result<Self> {
        let mut segments = path.segments();
        let (Some(lang), Some(name), None) = (segments.next(), segments.next(), segments.next()) else {
            return err!(NotFound: "not a post path", "path" => path);
        };

        let Some((id, _)) = name.split_once('-') else {
            return err!(NotFound: "not a post path", "path" => path);
        };

        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return err! {
                BadRequest: "post path does not start with a numeric id",
                "path" => path,
                "id" => id,
            };
        }

        Ok(PostPath { lang, name, id })
    }
}

/// The canonical URL for a post in `lang` whose stored fragment is
/// `fragment`, e.g. `31415-EN-lorem-ipsum.md` in `en` becomes
/// `/en/31415-lorem-ipsum.html`.
///
/// The fragment's last two characters are dropped, every `-<LANG>-` marker
/// collapses to `-`, and `.html` is appended, reusing a trailing `.` left
/// over from the stored extension.
pub fn canonical_url(lang: &str, fragment: &str) -> String {
    let stem = match fragment.char_indices().rev().nth(STORED_SUFFIX_LEN - 1) {
        Some((i, _)) => &fragment[..i],
        None => "",
    };

    let stem = stem.strip_suffix('.').unwrap_or(stem);
    let marker = format!("-{}-", lang.to_uppercase());
    format!("/{lang}/{}.{POST_URL_EXTENSION}", stem.replace(&marker, "-"))
}

/// Percent-encodes each segment of a decoded path for use in a `Location`.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

use std::{fmt, io};
use std::panic::Location;
use std::error::Error as StdError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// How a failure surfaces at the response boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The request itself is unacceptable: unknown extension, malformed path
    /// or post identifier.
    BadRequest,
    /// Something the request names does not exist.
    NotFound,
    /// A source file exists but could not be decoded.
    ParseFailure,
    /// Anything else: I/O, engine and configuration failures.
    Internal,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::ParseFailure | Status::Internal => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::ParseFailure | Status::Internal => "Internal Server Error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

#[derive(Debug)]
pub struct Error {
    status: Status,
    detail: Vec<Box<dyn ErrorDetail>>,
    prev: Option<Box<Error>>,
    _location: &'static Location<'static>,
}

pub trait ErrorDetail: fmt::Display + fmt::Debug + Send + Sync {
    fn context(&self) -> Vec<(Option<String>, String)> { vec![] }
}

impl Error {
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// The first explicit status in the chain, outermost context first.
    pub fn status(&self) -> Status {
        match (self.status, &self.prev) {
            (Status::Internal, Some(prev)) => prev.status(),
            (status, _) => status,
        }
    }

    pub fn chain(self, mut other: Error) -> Self {
        #[inline]
        fn _chain(error: Error, behind: &mut Error) {
            if let Some(prev) = behind.prev.as_mut() {
                _chain(error, prev);
            } else {
                behind.prev = Some(Box::new(error));
            }
        }

        _chain(self, &mut other);
        other
    }
}

impl ErrorDetail for &(dyn StdError + Send + Sync) {
    fn context(&self) -> Vec<(Option<String>, String)> {
        let mut ctxt = vec![];
        let mut error = self.source();
        while let Some(e) = error {
            ctxt.push((None, e.to_string()));
            error = e.source();
        }

        ctxt
    }
}

macro_rules! impl_error_detail_with_std_error {
    ($T:ty) => {
        impl $crate::error::ErrorDetail for $T {
            fn context(&self) -> Vec<(Option<String>, String)> {
                let error: &(dyn std::error::Error + Send + Sync) = self;
                error.context()
            }
        }
    }
}

impl_error_detail_with_std_error!(io::Error);
impl_error_detail_with_std_error!(toml::de::Error);
impl_error_detail_with_std_error!(serde_json::Error);
impl_error_detail_with_std_error!(std::string::FromUtf8Error);

impl ErrorDetail for String { }
impl ErrorDetail for &str { }

impl<T: ErrorDetail + 'static> From<T> for Error {
    #[track_caller]
    fn from(detail: T) -> Self {
        Error {
            status: Status::Internal,
            prev: None,
            detail: vec![Box::new(detail)],
            _location: std::panic::Location::caller(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Copy, Clone)] struct Indent(usize);

        impl fmt::Display for Indent {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for _ in 0..(self.0 * 4) { write!(f, " ")? }
                Ok(())
            }
        }

        struct NestedError<'a>(Indent, &'a Error);

        impl fmt::Display for NestedError<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let NestedError(indent, e) = self;

                for detail in &e.detail {
                    let indent_line = format!("\n{indent}");

                    writeln!(f, "{indent}{}", format!("{:#}", detail).replace('\n', &indent_line))?;
                    if let Some(prev) = &e.prev {
                        NestedError(Indent(indent.0 + 1), prev).fmt(f)?;
                    }

                    for (key, value) in detail.context() {
                        let value = value.to_string().replace('\n', &indent_line);
                        if let Some(key) = key {
                            writeln!(f, "{indent}{key}: {value}")?;
                        } else {
                            writeln!(f, "{indent}{value}")?;
                        }
                    }

                    if std::env::var_os("RUST_BACKTRACE").is_some() {
                        writeln!(f, "{indent}[{}]", e._location)?;
                    }
                }

                Ok(())
            }
        }

        NestedError(Indent(0), self).fmt(f)
    }
}

#[derive(Debug)]
pub struct MakeshiftError {
    pub message: String,
    pub parameters: Vec<(Option<String>, String)>,
}

#[doc(hidden)]
#[macro_export]
macro_rules! err {
    ($($token:tt)*) => (Err($crate::error!($($token)*)));
}

/// Builds an [`Error`](crate::error::Error) from a message and context.
///
/// Context is a comma-separated list of `value` or `key => value` entries,
/// optionally guarded with `if cond =>`. A leading `Status:` sets the
/// error's [`Status`](crate::error::Status):
///
/// ```rust
/// use snug::error;
/// use snug::error::Status;
///
/// let e = error!(NotFound: "post not found", "id" => 31415);
/// assert_eq!(e.status(), Status::NotFound);
/// assert!(e.to_string().contains("id: 31415"));
/// ```
#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($status:ident : $msg:expr, $($rest:tt)*) => (
        $crate::error!($msg, $($rest)*).with_status($crate::error::Status::$status)
    );

    ($status:ident : $msg:expr) => ( $crate::error!($status: $msg,) );

    ($msg:expr, $($rest:tt)*) => (
        $crate::error::Error::from($crate::error::MakeshiftError {
            message: $msg.to_string(),
            parameters: {
                #[allow(unused_mut)]
                let mut v: Vec<(Option<String>, String)> = Vec::new();
                $crate::error!(@param v $($rest)*);
                v
            },
        })
    );

    ($msg:expr) => ( $crate::error!($msg,) );

    (@param $v:ident if $cond:expr => $value:expr $(, $rest:tt)*) => {
        if $cond {
            $v.push((None, $value.to_string()));
        }

        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident if $cond:expr => $key:expr => $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v if $cond => $key => $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident if $cond:expr => $key:expr => $value:expr) => {
        if $cond {
            $crate::error!(@param $v $key => $value);
        }
    };

    (@param $v:ident $key:expr => $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $key => $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $key:expr => $value:expr) => {
        $v.push((Some($key.to_string()), $value.to_string()));
    };

    (@param $v:ident $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $value:expr) => {
        $v.push((None, $value.to_string()));
    };

    (@param $v:ident $(,)?) => { };
}

impl fmt::Display for MakeshiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl ErrorDetail for MakeshiftError {
    fn context(&self) -> Vec<(Option<String>, String)> {
        self.parameters.clone()
    }
}

pub trait Chainable<T> {
    fn chain(self, other: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, other: impl Into<Error>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(other.into()))
        }
    }

    fn chain_with<F, Err>(self, f: F) -> Result<T>
        where F: FnOnce() -> Err, Err: Into<Error>,
     {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(f().into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_survives_outer_context() {
        let inner: Result<()> = err!(NotFound: "no descriptor", "id" => "31415");
        let outer = inner.chain(error!("failed to resolve post")).unwrap_err();

        assert_eq!(outer.status(), Status::NotFound);
        let rendered = outer.to_string();
        assert!(rendered.contains("failed to resolve post"));
        assert!(rendered.contains("no descriptor"));
        assert!(rendered.contains("id: 31415"));
    }

    #[test]
    fn outer_status_wins() {
        let inner = error!(ParseFailure: "bad header");
        let outer = inner.chain(error!(BadRequest: "bad request"));
        assert_eq!(outer.status(), Status::BadRequest);
    }

    #[test]
    fn plain_errors_are_internal() {
        let io = io::Error::new(io::ErrorKind::Other, "disk on fire");
        let error = Error::from(io);
        assert_eq!(error.status(), Status::Internal);
        assert_eq!(error.status().code(), 500);
    }

    #[test]
    fn conditional_parameters() {
        let error = error!("oops", if false => "hidden" => 1, if true => "shown" => 2);
        let rendered = error.to_string();
        assert!(!rendered.contains("hidden"));
        assert!(rendered.contains("shown: 2"));
    }

    static_assertions::assert_impl_all!(Error: Send, Sync);
}

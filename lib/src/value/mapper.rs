use crate::error::{ErrorDetail, Result};
use crate::value::Source;

/// Turns a [`Source`] into compiled output.
pub trait Mapper {
    type Output;

    fn map<I: Source>(&self, input: I) -> Result<Self::Output>;
}

pub trait Format: Sized {
    /// The data format's error type.
    type Error: serde::de::Error + ErrorDetail + 'static;

    /// Parses `string` as the data format `Self` as a `T` or returns an error
    /// if the `string` is an invalid `T`. Prefer [`Format::read()`], which
    /// reads from any [`Source`].
    fn from_str<T: serde::de::DeserializeOwned>(string: &str) -> Result<T, Self::Error>;

    fn read<I: Source, T: serde::de::DeserializeOwned>(input: I) -> Result<T> {
        let input = input.read()?;
        Ok(Self::from_str(&input)?)
    }
}

macro_rules! impl_format {
    ($name:ident : $func:expr, $E:ty) => (
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl Format for $name {
            type Error = $E;

            fn from_str<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, $E> {
                $func(s)
            }
        }
    );
}

impl_format!(Toml: toml::from_str, toml::de::Error);
impl_format!(Json: serde_json::from_str, serde_json::error::Error);

/// Compiles SCSS/Sass to CSS. Reading from a path lets `@use` and `@import`
/// resolve relative to the stylesheet.
#[cfg(feature = "sass")]
#[derive(Debug, Default)]
pub struct Grass {
    options: grass::Options<'static>,
}

#[cfg(feature = "sass")]
impl Mapper for Grass {
    type Output = String;

    fn map<I: Source>(&self, input: I) -> Result<Self::Output> {
        let result = match input.path() {
            Some(path) => grass::from_path(path, &self.options),
            None => input.read()
                .map(|string| grass::from_string(&*string, &self.options))?,
        };

        result.map_err(|e| error!("failed to render sass as css", e))
    }
}

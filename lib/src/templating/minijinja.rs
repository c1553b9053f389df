use std::path::Path;

use minijinja::{AutoEscape, Environment, path_loader};
use minijinja::value::Value;
use serde::Serialize;

use crate::error::Result;
use crate::value::Dict;
use crate::templating::{Engine, EngineInit};

#[derive(Debug)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl EngineInit for MiniJinjaEngine {
    type Engine = Self;

    fn init<G: Serialize>(root: &Path, globals: G) -> Result<Self::Engine> {
        let mut env = Environment::new();
        env.set_loader(path_loader(root));

        // Bodies and post content arrive as rendered HTML.
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_global("G", Value::from_serializable(&globals));
        env.add_function("now", ext::now);
        env.add_filter("deslug", ext::deslug);
        env.add_filter("date", ext::date);
        env.add_filter("split", ext::split);
        Ok(MiniJinjaEngine { env })
    }
}

impl Engine for MiniJinjaEngine {
    fn render(&self, name: &str, data: &Dict) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(Value::from_serializable(data))?)
    }

    fn render_str(
        &self,
        name: Option<&str>,
        template_str: &str,
        data: &Dict,
    ) -> Result<String> {
        let context = Value::from_serializable(data);
        let string = match name {
            Some(name) => self.env.render_named_str(name, template_str, context)?,
            None => self.env.render_str(template_str, context)?,
        };

        Ok(string)
    }
}

mod ext {
    use chrono::{NaiveDate, NaiveTime, NaiveDateTime, DateTime, Utc};
    use minijinja::{value::Value, Error, ErrorKind};

    pub fn deslug(value: &str) -> String {
        value.replace('-', " ")
    }

    pub fn date(value: Value, fmt: &str) -> Result<Value, Error> {
        if let Ok(ts) = i64::try_from(value.clone()) {
            let datetime = DateTime::<Utc>::from_timestamp(ts, 0)
                .ok_or_else(|| Error::new(
                    ErrorKind::InvalidOperation,
                    "invalid timestamp provided to `date`"
                ))?;

            return Ok(datetime.format(fmt).to_string().into());
        }

        let kind = value.kind();
        let attr = value.get_attr("$__toml_private_datetime");
        let string = attr.as_ref()
            .ok()
            .and_then(|v| v.as_str())
            .or_else(|| value.as_str())
            .ok_or_else(|| Error::new(
                ErrorKind::InvalidOperation,
                format!("`date` must be applied to a string or integer, found {kind}")
            ))?;

        let datetime = string.parse::<NaiveDate>().map(|d| d.format(fmt))
            .or_else(|_| string.parse::<NaiveTime>().map(|t| t.format(fmt)))
            .or_else(|_| string.parse::<NaiveDateTime>().map(|dt| dt.format(fmt)))
            .or_else(|_| string.parse::<DateTime<Utc>>().map(|dt| dt.format(fmt)))
            .map_err(|e| Error::new(
                ErrorKind::InvalidOperation,
                format!("failed to parse {string}: {e}")
            ))?;

        Ok(datetime.to_string().into())
    }

    pub fn split(value: &str, pat: &str, n: Option<usize>) -> Result<Value, Error> {
        match n {
            Some(n) => Ok(value.split(pat).nth(n).map(Value::from).unwrap_or(Value::UNDEFINED)),
            None => Ok(value.split(pat).map(Value::from).collect()),
        }
    }

    pub fn now() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    }
}

impl_error_detail_with_std_error!(minijinja::Error);

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::dict;

    fn engine(root: &Path) -> MiniJinjaEngine {
        MiniJinjaEngine::init(root, dict! { "name" => "snug" }).unwrap()
    }

    #[test]
    fn renders_named_templates_from_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_layout.jinja"), "<title>{{ title }}</title>{{ body }}").unwrap();

        let data = dict! { "title" => "About", "body" => "<p>hi & bye</p>" };
        let html = engine(dir.path()).render("_layout.jinja", &data).unwrap();
        assert_eq!(html, "<title>About</title><p>hi & bye</p>");
    }

    #[test]
    fn renders_strings_with_globals_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path());

        let data = dict! { "slug" => "lorem-ipsum", "when" => "2014-03-14" };
        let out = engine.render_str(
            Some("post.jinja"),
            "{{ G.name }}: {{ slug | deslug }} ({{ when | date('%d.%m.%Y') }})",
            &data,
        ).unwrap();

        assert_eq!(out, "snug: lorem ipsum (14.03.2014)");
    }

    #[test]
    fn missing_templates_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(engine(dir.path()).render("nope.jinja", &Dict::new()).is_err());
    }
}
